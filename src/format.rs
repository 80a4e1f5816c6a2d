//! Localized formatting for the properties dialog.
//!
//! Everything here is fail-soft: absent or malformed inputs yield `None` and
//! the refresh logic turns that into the placeholder.

use rust_i18n::t;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::document::PageSizeInches;
use crate::i18n::L10n;
use crate::pdf_date;
use crate::ui;

const MM_PER_INCH: f64 = 25.4;

/// Paper sizes named by their portrait-oriented dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageName {
    Letter,
    Legal,
    A3,
    A4,
}

/// US customary sizes, keyed by hundredths of an inch.
const US_PAGE_SIZES: &[((i64, i64), PageName)] = &[
    ((850, 1100), PageName::Letter),
    ((850, 1400), PageName::Legal),
];

/// Metric sizes, keyed by tenths of a millimeter.
const METRIC_PAGE_SIZES: &[((i64, i64), PageName)] = &[
    ((2970, 4200), PageName::A3),
    ((2100, 2970), PageName::A4),
];

/// Localized file-size string, e.g. "1.23 MB (1,290,000 bytes)".
///
/// `None` for a zero/unknown size. Megabytes from 1 MiB upward, kilobytes
/// below that, rounded to 3 significant digits.
pub fn file_size(size_bytes: u64, l10n: &L10n) -> Option<String> {
    if size_bytes == 0 {
        return None;
    }
    let kilobytes = size_bytes as f64 / 1024.0;
    let megabytes = kilobytes / 1024.0;
    let size_b = group_digits(&size_bytes.to_string(), l10n);

    let text = if megabytes >= 1.0 {
        t!(
            "properties.size_mb",
            locale = l10n.language(),
            size_mb = format_number(to_precision(megabytes, 3), l10n),
            size_b = size_b
        )
    } else {
        t!(
            "properties.size_kb",
            locale = l10n.language(),
            size_kb = format_number(to_precision(kilobytes, 3), l10n),
            size_b = size_b
        )
    };
    Some(text.to_string())
}

/// Localized "date, time" composite from a raw PDF date string.
pub fn date_time(raw: Option<&str>, l10n: &L10n) -> Option<String> {
    const DATE_EN: &[FormatItem<'static>] =
        format_description!("[month padding:none]/[day padding:none]/[year]");
    const TIME_EN: &[FormatItem<'static>] =
        format_description!("[hour repr:12 padding:none]:[minute]:[second] [period]");
    const DATE_INTL: &[FormatItem<'static>] =
        format_description!("[day padding:none].[month padding:none].[year]");
    const TIME_INTL: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

    let stamp = pdf_date::parse(raw?)?;
    // Rendered in the offset the stamp carries; shifting to the host timezone
    // would make the same file display differently on every machine.
    let (date_items, time_items) = match l10n.language() {
        "en" => (DATE_EN, TIME_EN),
        _ => (DATE_INTL, TIME_INTL),
    };
    let date = stamp.format(date_items).ok()?;
    let time = stamp.format(time_items).ok()?;
    Some(
        t!(
            "properties.date_time",
            locale = l10n.language(),
            date = date,
            time = time
        )
        .to_string(),
    )
}

/// Localized page-size description, e.g. "8.5 × 11 in (Letter, portrait)".
///
/// Rotation of an odd multiple of 90° swaps the displayed axes. The name
/// lookup keys on portrait-oriented dimensions; metric sizes within 0.1 mm of
/// an integer size snap to it so both unit systems agree with the name.
pub fn page_size(size: PageSizeInches, rotation: u32, l10n: &L10n) -> Option<String> {
    if !(size.width > 0.0 && size.height > 0.0) {
        return None;
    }
    let (width, height) = if rotation % 180 != 0 {
        (size.height, size.width)
    } else {
        (size.width, size.height)
    };
    let portrait = ui::is_portrait(width, height);

    // Hundredths of an inch and tenths of a millimeter, the display precisions.
    let mut inches = ((width * 100.0).round() as i64, (height * 100.0).round() as i64);
    let mut millimeters = (
        (width * MM_PER_INCH * 10.0).round() as i64,
        (height * MM_PER_INCH * 10.0).round() as i64,
    );

    let mut name = page_name(inches, portrait, US_PAGE_SIZES)
        .or_else(|| page_name(millimeters, portrait, METRIC_PAGE_SIZES));

    if name.is_none() && (millimeters.0 % 10 != 0 || millimeters.1 % 10 != 0) {
        let exact = (width * MM_PER_INCH, height * MM_PER_INCH);
        let snapped = (
            (millimeters.0 as f64 / 10.0).round() as i64,
            (millimeters.1 as f64 / 10.0).round() as i64,
        );
        if (exact.0 - snapped.0 as f64).abs() < 0.1 && (exact.1 - snapped.1 as f64).abs() < 0.1 {
            name = page_name((snapped.0 * 10, snapped.1 * 10), portrait, METRIC_PAGE_SIZES);
            if name.is_some() {
                // Keep both displayed unit systems consistent with the name.
                millimeters = (snapped.0 * 10, snapped.1 * 10);
                inches = (
                    (snapped.0 as f64 / MM_PER_INCH * 100.0).round() as i64,
                    (snapped.1 as f64 / MM_PER_INCH * 100.0).round() as i64,
                );
            }
        }
    }

    let locale = l10n.language();
    let (dimensions, unit) = if l10n.is_non_metric() {
        (
            (inches.0 as f64 / 100.0, inches.1 as f64 / 100.0),
            t!("properties.unit_inches", locale = locale),
        )
    } else {
        (
            (millimeters.0 as f64 / 10.0, millimeters.1 as f64 / 10.0),
            t!("properties.unit_millimeters", locale = locale),
        )
    };
    let orientation = if portrait {
        t!("properties.orientation_portrait", locale = locale)
    } else {
        t!("properties.orientation_landscape", locale = locale)
    };
    let width_text = format_number(dimensions.0, l10n);
    let height_text = format_number(dimensions.1, l10n);

    let text = match name {
        Some(name) => t!(
            "properties.page_size_name",
            locale = locale,
            width = width_text,
            height = height_text,
            unit = unit,
            name = name_label(name, l10n),
            orientation = orientation
        ),
        None => t!(
            "properties.page_size",
            locale = locale,
            width = width_text,
            height = height_text,
            unit = unit,
            orientation = orientation
        ),
    };
    Some(text.to_string())
}

/// Localized yes/no for the fast-web-view flag.
pub fn linearized(flag: bool, l10n: &L10n) -> String {
    let text = if flag {
        t!("properties.linearized_yes", locale = l10n.language())
    } else {
        t!("properties.linearized_no", locale = l10n.language())
    };
    text.to_string()
}

fn page_name(scaled: (i64, i64), portrait: bool, table: &[((i64, i64), PageName)]) -> Option<PageName> {
    let key = if portrait { scaled } else { (scaled.1, scaled.0) };
    table
        .iter()
        .find(|(size, _)| *size == key)
        .map(|(_, name)| *name)
}

fn name_label(name: PageName, l10n: &L10n) -> String {
    let locale = l10n.language();
    let text = match name {
        PageName::Letter => t!("properties.size_name_letter", locale = locale),
        PageName::Legal => t!("properties.size_name_legal", locale = locale),
        PageName::A3 => t!("properties.size_name_a3", locale = locale),
        PageName::A4 => t!("properties.size_name_a4", locale = locale),
    };
    text.to_string()
}

/// Round to `digits` significant digits.
fn to_precision(value: f64, digits: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}

/// Decimal rendering with locale separators, trailing zeros trimmed.
fn format_number(value: f64, l10n: &L10n) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed.split_once('.') {
        Some((int, frac)) => format!(
            "{}{}{}",
            group_digits(int, l10n),
            l10n.decimal_separator(),
            frac
        ),
        None => group_digits(trimmed, l10n),
    }
}

/// Insert the locale thousands separator into a run of digits.
fn group_digits(digits: &str, l10n: &L10n) -> String {
    let separator = l10n.thousands_separator();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> L10n {
        L10n::new("en")
    }

    fn en_us() -> L10n {
        L10n::new("en-US")
    }

    #[test]
    fn file_size_uses_kilobytes_below_one_mebibyte() {
        assert_eq!(
            file_size(102_400, &en()).unwrap(),
            "100 KB (102,400 bytes)"
        );
        assert_eq!(
            file_size(1_048_575, &en()).unwrap(),
            "1,020 KB (1,048,575 bytes)"
        );
    }

    #[test]
    fn file_size_switches_to_megabytes_at_one_mebibyte() {
        assert_eq!(
            file_size(1_048_576, &en()).unwrap(),
            "1 MB (1,048,576 bytes)"
        );
        assert_eq!(
            file_size(1_290_000, &en()).unwrap(),
            "1.23 MB (1,290,000 bytes)"
        );
    }

    #[test]
    fn file_size_zero_has_no_value() {
        assert_eq!(file_size(0, &en()), None);
    }

    #[test]
    fn file_size_follows_icelandic_separators() {
        assert_eq!(
            file_size(1_290_000, &L10n::new("is")).unwrap(),
            "1,23 MB (1.290.000 bæti)"
        );
    }

    #[test]
    fn rounds_to_three_significant_digits() {
        assert!((to_precision(1023.999, 3) - 1020.0).abs() < 1e-9);
        assert!((to_precision(1.23456, 3) - 1.23).abs() < 1e-9);
        assert!((to_precision(10.25, 3) - 10.3).abs() < 1e-9);
        assert!((to_precision(0.0, 3) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn letter_pages_name_in_inches_for_imperial_locales() {
        let size = PageSizeInches {
            width: 8.5,
            height: 11.0,
        };
        assert_eq!(
            page_size(size, 0, &en_us()).unwrap(),
            "8.5 × 11 in (Letter, portrait)"
        );
    }

    #[test]
    fn legal_pages_are_recognized() {
        let size = PageSizeInches {
            width: 8.5,
            height: 14.0,
        };
        assert_eq!(
            page_size(size, 0, &en_us()).unwrap(),
            "8.5 × 14 in (Legal, portrait)"
        );
    }

    #[test]
    fn a4_pages_name_in_millimeters_for_metric_locales() {
        let size = PageSizeInches {
            width: 210.0 / MM_PER_INCH,
            height: 297.0 / MM_PER_INCH,
        };
        assert_eq!(
            page_size(size, 0, &en()).unwrap(),
            "210 × 297 mm (A4, portrait)"
        );
    }

    #[test]
    fn a3_pages_are_recognized() {
        let size = PageSizeInches {
            width: 297.0 / MM_PER_INCH,
            height: 420.0 / MM_PER_INCH,
        };
        assert_eq!(
            page_size(size, 0, &en()).unwrap(),
            "297 × 420 mm (A3, portrait)"
        );
    }

    #[test]
    fn near_integer_millimeters_display_as_rounded() {
        // 210.04 mm × 296.98 mm rounds to the named size at display precision.
        let size = PageSizeInches {
            width: 210.04 / MM_PER_INCH,
            height: 296.98 / MM_PER_INCH,
        };
        assert_eq!(
            page_size(size, 0, &en()).unwrap(),
            "210 × 297 mm (A4, portrait)"
        );
    }

    #[test]
    fn fuzzy_match_snaps_both_unit_systems_to_the_name() {
        // 209.93 mm × 296.93 mm: not a table hit even at display precision,
        // but within 0.1 mm of A4 on both axes.
        let size = PageSizeInches {
            width: 209.93 / MM_PER_INCH,
            height: 296.93 / MM_PER_INCH,
        };
        assert_eq!(
            page_size(size, 0, &en()).unwrap(),
            "210 × 297 mm (A4, portrait)"
        );
        assert_eq!(
            page_size(size, 0, &en_us()).unwrap(),
            "8.27 × 11.69 in (A4, portrait)"
        );
    }

    #[test]
    fn fuzzy_match_requires_both_axes_close() {
        let size = PageSizeInches {
            width: 209.93 / MM_PER_INCH,
            height: 296.5 / MM_PER_INCH,
        };
        assert_eq!(
            page_size(size, 0, &en()).unwrap(),
            "209.9 × 296.5 mm (portrait)"
        );
    }

    #[test]
    fn quarter_rotations_swap_the_axes() {
        let size = PageSizeInches {
            width: 8.5,
            height: 11.0,
        };
        assert_eq!(
            page_size(size, 90, &en_us()).unwrap(),
            "11 × 8.5 in (Letter, landscape)"
        );
        assert_eq!(
            page_size(size, 270, &en_us()).unwrap(),
            "11 × 8.5 in (Letter, landscape)"
        );
    }

    #[test]
    fn half_rotations_do_not_swap() {
        let size = PageSizeInches {
            width: 8.5,
            height: 11.0,
        };
        assert_eq!(
            page_size(size, 180, &en_us()).unwrap(),
            "8.5 × 11 in (Letter, portrait)"
        );
    }

    #[test]
    fn landscape_pages_still_match_their_portrait_name() {
        let size = PageSizeInches {
            width: 11.0,
            height: 8.5,
        };
        assert_eq!(
            page_size(size, 0, &en_us()).unwrap(),
            "11 × 8.5 in (Letter, landscape)"
        );
    }

    #[test]
    fn degenerate_pages_have_no_value() {
        let zero = PageSizeInches {
            width: 0.0,
            height: 11.0,
        };
        assert_eq!(page_size(zero, 0, &en_us()), None);
        let negative = PageSizeInches {
            width: 8.5,
            height: -1.0,
        };
        assert_eq!(page_size(negative, 0, &en_us()), None);
    }

    #[test]
    fn unnamed_sizes_render_dimensions_only() {
        let size = PageSizeInches {
            width: 5.0,
            height: 7.0,
        };
        assert_eq!(
            page_size(size, 0, &en_us()).unwrap(),
            "5 × 7 in (portrait)"
        );
    }

    #[test]
    fn dates_render_per_locale() {
        let raw = Some("D:20240615142312+02'00'");
        assert_eq!(
            date_time(raw, &en()).unwrap(),
            "6/15/2024, 2:23:12 PM"
        );
        assert_eq!(
            date_time(raw, &L10n::new("is")).unwrap(),
            "15.6.2024 kl. 14:23:12"
        );
    }

    #[test]
    fn unparseable_dates_have_no_value() {
        assert_eq!(date_time(Some("not a date"), &en()), None);
        assert_eq!(date_time(None, &en()), None);
    }

    #[test]
    fn linearized_flag_localizes() {
        assert_eq!(linearized(true, &en()), "Yes");
        assert_eq!(linearized(false, &en()), "No");
        assert_eq!(linearized(true, &L10n::new("is-IS")), "Já");
    }
}
