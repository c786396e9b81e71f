//! Spreadsheet formula expressions.
//!
//! The report never writes formula text by hand. It builds a [`FormulaExpr`]
//! from cell addresses, renders it to A1 formula text and evaluates it
//! against the sheet built so far, so every formula cell also carries its
//! value.

use ordermerge_sheet::{CellAddr, CellValue, Sheet};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
}

impl BinaryOperator {
    fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply => 2,
        }
    }
}

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Literal(f64),
    /// Cell reference
    CellRef(CellAddr),
    /// `SUM(first:last)`
    SumRange { first: CellAddr, last: CellAddr },
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
}

/// Numeric view of the cells a formula refers to.
pub trait ValueResolver {
    /// Numeric value at `addr`; blanks and text count as 0.
    fn get_cell(&self, addr: CellAddr) -> f64;

    fn get_range(&self, first: CellAddr, last: CellAddr) -> Vec<f64> {
        let (top, bottom) = (first.row.min(last.row), first.row.max(last.row));
        let (left, right) = (first.col.min(last.col), first.col.max(last.col));
        (top..=bottom)
            .flat_map(|row| (left..=right).map(move |col| CellAddr::new(row, col)))
            .map(|addr| self.get_cell(addr))
            .collect()
    }
}

impl ValueResolver for Sheet {
    fn get_cell(&self, addr: CellAddr) -> f64 {
        self.get(addr).as_float().unwrap_or(0.0)
    }
}

impl FormulaExpr {
    #[must_use]
    pub fn cell(addr: CellAddr) -> Self {
        FormulaExpr::CellRef(addr)
    }

    #[must_use]
    pub fn sum_range(first: CellAddr, last: CellAddr) -> Self {
        FormulaExpr::SumRange { first, last }
    }

    /// `a+b+c` over the given references; the literal 0 when empty.
    #[must_use]
    pub fn sum_of<I: IntoIterator<Item = CellAddr>>(refs: I) -> Self {
        refs.into_iter()
            .map(FormulaExpr::CellRef)
            .reduce(|acc, next| acc + next)
            .unwrap_or(FormulaExpr::Literal(0.0))
    }

    fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::BinaryOp { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }

    /// Formula text with the leading `=`, as stored in the workbook.
    #[must_use]
    pub fn to_formula(&self) -> String {
        format!("={self}")
    }

    /// Evaluate against already written cells.
    #[must_use]
    pub fn evaluate(&self, resolver: &impl ValueResolver) -> f64 {
        match self {
            FormulaExpr::Literal(value) => *value,
            FormulaExpr::CellRef(addr) => resolver.get_cell(*addr),
            FormulaExpr::SumRange { first, last } => resolver.get_range(*first, *last).iter().sum(),
            FormulaExpr::BinaryOp { op, left, right } => {
                let (l, r) = (left.evaluate(resolver), right.evaluate(resolver));
                match op {
                    BinaryOperator::Add => l + r,
                    BinaryOperator::Subtract => l - r,
                    BinaryOperator::Multiply => l * r,
                }
            }
        }
    }

    /// Formula cell value carrying the evaluated result.
    #[must_use]
    pub fn to_cell(&self, resolver: &impl ValueResolver) -> CellValue {
        CellValue::formula_with_result(self.to_formula(), CellValue::Float(self.evaluate(resolver)))
    }
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Literal(value) => write!(f, "{value}"),
            FormulaExpr::CellRef(addr) => write!(f, "{addr}"),
            FormulaExpr::SumRange { first, last } => write!(f, "SUM({first}:{last})"),
            FormulaExpr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                if left.precedence() < prec {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, "{}", op.symbol())?;
                // a-(b-c) and a*(b+c) keep their grouping
                let right_needs_parens = right.precedence() < prec
                    || (*op == BinaryOperator::Subtract && right.precedence() == prec);
                if right_needs_parens {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
        }
    }
}

impl Add for FormulaExpr {
    type Output = FormulaExpr;

    fn add(self, rhs: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Add, self, rhs)
    }
}

impl Sub for FormulaExpr {
    type Output = FormulaExpr;

    fn sub(self, rhs: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Subtract, self, rhs)
    }
}

impl Mul for FormulaExpr {
    type Output = FormulaExpr;

    fn mul(self, rhs: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(BinaryOperator::Multiply, self, rhs)
    }
}
