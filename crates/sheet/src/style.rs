//! Immutable cell style descriptors.
//!
//! A style is a plain value attached to a cell when it is written. There is
//! no shared registry: two cells with equal descriptors simply compare equal,
//! and the xlsx writer turns each descriptor into a format on demand.

/// 24-bit RGB colour, e.g. `Rgb(0x3498DB)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    #[default]
    General,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub size: Option<f64>,
    pub color: Option<Rgb>,
}

/// Visual attributes of one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    pub fill: Option<Rgb>,
    pub font: FontStyle,
    pub h_align: HAlign,
    pub v_center: bool,
    pub wrap: bool,
    pub border: BorderStyle,
    pub num_format: Option<String>,
}

impl CellStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fill(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.font.italic = true;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = Some(size);
        self
    }

    #[must_use]
    pub fn font_color(mut self, color: Rgb) -> Self {
        self.font.color = Some(color);
        self
    }

    #[must_use]
    pub fn align(mut self, align: HAlign) -> Self {
        self.h_align = align;
        self
    }

    #[must_use]
    pub fn v_center(mut self) -> Self {
        self.v_center = true;
        self
    }

    #[must_use]
    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    #[must_use]
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    #[must_use]
    pub fn num_format(mut self, format: impl Into<String>) -> Self {
        self.num_format = Some(format.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_attributes() {
        let style = CellStyle::new()
            .fill(Rgb(0x3498DB))
            .bold()
            .font_size(11.0)
            .font_color(Rgb(0xFFFFFF))
            .align(HAlign::Center)
            .v_center()
            .border(BorderStyle::Thin);

        assert_eq!(style.fill, Some(Rgb(0x3498DB)));
        assert!(style.font.bold);
        assert!(!style.font.italic);
        assert_eq!(style.font.size, Some(11.0));
        assert_eq!(style.h_align, HAlign::Center);
        assert_eq!(style.border, BorderStyle::Thin);
        assert_eq!(style.num_format, None);
    }

    #[test]
    fn test_equal_descriptors_compare_equal() {
        let a = CellStyle::new().bold().num_format("#,##0.00");
        let b = CellStyle::new().bold().num_format("#,##0.00");
        assert_eq!(a, b);
        assert_ne!(a, b.italic());
    }
}
