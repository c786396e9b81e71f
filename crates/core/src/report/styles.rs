//! Report palette and style descriptors.
//!
//! Every function returns a fresh [`CellStyle`] value; nothing here is shared
//! or mutated after creation.

use crate::currency::CurrencyCode;
use ordermerge_sheet::{BorderStyle, CellStyle, HAlign, Rgb};

pub const BANNER: Rgb = Rgb(0x1B_2631);
pub const SLATE: Rgb = Rgb(0x2C_3E50);
pub const GOLD: Rgb = Rgb(0xF3_9C12);
pub const ACCENT: Rgb = Rgb(0x29_80B9);
pub const HEADER_BLUE: Rgb = Rgb(0x34_98DB);
pub const NAVY: Rgb = Rgb(0x1A_5276);
pub const LABEL_TINT: Rgb = Rgb(0xEB_F5FB);
pub const VALUE_TINT: Rgb = Rgb(0xD4_E6F1);
pub const PROFIT_GREEN: Rgb = Rgb(0x27_AE60);
pub const MUTED_GREY: Rgb = Rgb(0x80_8080);
pub const WHITE: Rgb = Rgb(0xFF_FFFF);

/// Number format for amounts in `currency`: `"€"#,##0.00`, or a bare
/// `#,##0.00` when no currency was detected.
#[must_use]
pub fn price_format(currency: &CurrencyCode) -> String {
    match currency.display_prefix() {
        "" => "#,##0.00".to_string(),
        prefix => format!("\"{prefix}\"#,##0.00"),
    }
}

fn banner_band(fill: Rgb, color: Rgb, size: f64) -> CellStyle {
    CellStyle::new()
        .fill(fill)
        .bold()
        .font_size(size)
        .font_color(color)
        .align(HAlign::Center)
        .v_center()
}

#[must_use]
pub fn title_banner() -> CellStyle {
    banner_band(BANNER, WHITE, 18.0)
}

#[must_use]
pub fn vessel_banner() -> CellStyle {
    banner_band(SLATE, GOLD, 13.0)
}

#[must_use]
pub fn info_banner() -> CellStyle {
    banner_band(ACCENT, WHITE, 10.0)
}

#[must_use]
pub fn gold_rule() -> CellStyle {
    CellStyle::new().fill(GOLD)
}

/// The grey italic `Order: file` line.
#[must_use]
pub fn order_line() -> CellStyle {
    CellStyle::new().italic().font_size(9.0).font_color(MUTED_GREY)
}

#[must_use]
pub fn header_label() -> CellStyle {
    CellStyle::new()
        .bold()
        .font_size(9.0)
        .align(HAlign::Right)
        .v_center()
        .border(BorderStyle::Thin)
}

#[must_use]
pub fn header_value() -> CellStyle {
    CellStyle::new().font_size(9.0).border(BorderStyle::Thin)
}

#[must_use]
pub fn column_header() -> CellStyle {
    CellStyle::new()
        .fill(HEADER_BLUE)
        .bold()
        .font_size(11.0)
        .font_color(WHITE)
        .align(HAlign::Center)
        .v_center()
        .border(BorderStyle::Thin)
}

#[must_use]
pub fn data_cell() -> CellStyle {
    CellStyle::new().v_center().wrap().border(BorderStyle::Thin)
}

#[must_use]
pub fn money_cell(format: &str) -> CellStyle {
    data_cell().num_format(format)
}

#[must_use]
pub fn total_label() -> CellStyle {
    CellStyle::new()
        .bold()
        .font_size(11.0)
        .align(HAlign::Right)
        .v_center()
}

#[must_use]
pub fn total_value(format: &str) -> CellStyle {
    CellStyle::new().bold().font_size(11.0).num_format(format)
}

#[must_use]
pub fn summary_separator() -> CellStyle {
    CellStyle::new().fill(SLATE).border(BorderStyle::Thin)
}

#[must_use]
pub fn summary_title() -> CellStyle {
    banner_band(NAVY, WHITE, 13.0).border(BorderStyle::Thin)
}

/// Emphasis of a grand summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTone {
    Normal,
    Grand,
    Profit,
}

#[must_use]
pub fn summary_label(tone: SummaryTone) -> CellStyle {
    let style = CellStyle::new()
        .bold()
        .align(HAlign::Right)
        .v_center()
        .border(BorderStyle::Medium);
    match tone {
        SummaryTone::Normal => style.fill(LABEL_TINT).font_size(12.0).font_color(SLATE),
        SummaryTone::Grand => style.fill(NAVY).font_size(14.0).font_color(WHITE),
        SummaryTone::Profit => style.fill(PROFIT_GREEN).font_size(14.0).font_color(WHITE),
    }
}

#[must_use]
pub fn summary_value(tone: SummaryTone, format: &str) -> CellStyle {
    let style = CellStyle::new()
        .bold()
        .align(HAlign::Center)
        .v_center()
        .border(BorderStyle::Medium)
        .num_format(format);
    match tone {
        SummaryTone::Normal => style.fill(VALUE_TINT).font_size(12.0).font_color(NAVY),
        SummaryTone::Grand => style.fill(NAVY).font_size(14.0).font_color(WHITE),
        SummaryTone::Profit => style.fill(PROFIT_GREEN).font_size(14.0).font_color(WHITE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_format() {
        assert_eq!(price_format(&CurrencyCode::new("EUR")), "\"€\"#,##0.00");
        assert_eq!(price_format(&CurrencyCode::new("CHF")), "\"CHF\"#,##0.00");
        assert_eq!(price_format(&CurrencyCode::none()), "#,##0.00");
    }

    #[test]
    fn test_tones_differ() {
        assert_ne!(summary_label(SummaryTone::Normal), summary_label(SummaryTone::Grand));
        assert_eq!(summary_value(SummaryTone::Profit, "0").fill, Some(PROFIT_GREEN));
    }
}
