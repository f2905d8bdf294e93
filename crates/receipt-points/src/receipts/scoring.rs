use chrono::{Datelike, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use unicode_general_category::{get_general_category, GeneralCategory};

use super::domain::{Item, Receipt};

const ROUND_TOTAL_POINTS: u64 = 50;
const QUARTER_MULTIPLE_POINTS: u64 = 25;
const POINTS_PER_ITEM_PAIR: u64 = 5;
const ODD_DAY_POINTS: u64 = 6;
const AFTERNOON_POINTS: u64 = 10;
const AFTERNOON_START_HOUR: u32 = 14;
const AFTERNOON_END_HOUR: u32 = 16;

/// Points earned by each rule for a single receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointsBreakdown {
    pub retailer_name: u64,
    pub round_total: u64,
    pub quarter_multiple: u64,
    pub item_pairs: u64,
    pub item_descriptions: u64,
    pub odd_day: u64,
    pub afternoon: u64,
}

impl PointsBreakdown {
    pub fn for_receipt(receipt: &Receipt) -> Self {
        Self {
            retailer_name: retailer_name_points(&receipt.retailer),
            round_total: round_total_points(receipt.total),
            quarter_multiple: quarter_multiple_points(receipt.total),
            item_pairs: item_pair_points(receipt.items.len()),
            item_descriptions: receipt
                .items
                .iter()
                .map(description_points)
                .fold(0, u64::saturating_add),
            odd_day: if receipt.purchased_at.day() % 2 == 1 {
                ODD_DAY_POINTS
            } else {
                0
            },
            afternoon: afternoon_points(receipt.purchased_at.hour()),
        }
    }

    pub fn total(&self) -> u64 {
        [
            self.retailer_name,
            self.round_total,
            self.quarter_multiple,
            self.item_pairs,
            self.item_descriptions,
            self.odd_day,
            self.afternoon,
        ]
        .into_iter()
        .fold(0, u64::saturating_add)
    }

    /// Rule label and contribution pairs, in evaluation order.
    pub fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("retailer name", self.retailer_name),
            ("round total", self.round_total),
            ("quarter multiple", self.quarter_multiple),
            ("item pairs", self.item_pairs),
            ("item descriptions", self.item_descriptions),
            ("odd purchase day", self.odd_day),
            ("afternoon purchase", self.afternoon),
        ]
    }
}

/// Total points awarded for a validated receipt.
pub fn score(receipt: &Receipt) -> u64 {
    PointsBreakdown::for_receipt(receipt).total()
}

fn retailer_name_points(retailer: &str) -> u64 {
    retailer.chars().filter(|&c| is_letter_or_number(c)).count() as u64
}

// General categories L* and N*; combining marks do not count.
fn is_letter_or_number(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

fn round_total_points(total: Decimal) -> u64 {
    if total.fract().is_zero() {
        ROUND_TOTAL_POINTS
    } else {
        0
    }
}

fn quarter_multiple_points(total: Decimal) -> u64 {
    if (total % Decimal::new(25, 2)).is_zero() {
        QUARTER_MULTIPLE_POINTS
    } else {
        0
    }
}

fn item_pair_points(count: usize) -> u64 {
    (count / 2) as u64 * POINTS_PER_ITEM_PAIR
}

// Rounded up per item; the caller sums the integers.
fn description_points(item: &Item) -> u64 {
    let length = item.short_description.trim().chars().count();
    if length % 3 != 0 {
        return 0;
    }

    item.price
        .checked_mul(Decimal::new(2, 1))
        .map(|value| value.ceil())
        .map_or(u64::MAX, |value| value.to_u64().unwrap_or(u64::MAX))
}

fn afternoon_points(hour: u32) -> u64 {
    if (AFTERNOON_START_HOUR..AFTERNOON_END_HOUR).contains(&hour) {
        AFTERNOON_POINTS
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_alphanumeric_retailer_characters() {
        assert_eq!(retailer_name_points("M&M Corner Market"), 14);
        assert_eq!(retailer_name_points("  -&- "), 0);
        assert_eq!(retailer_name_points("Café 7"), 5);
    }

    #[test]
    fn combining_marks_are_not_letters() {
        // ह and द are letters; the vowel signs and anusvara are marks
        assert_eq!(retailer_name_points("हिंदी"), 2);
        assert_eq!(retailer_name_points("Cafe\u{301} Ⅻ ½"), 6);
    }

    #[test]
    fn description_points_saturate_for_huge_prices() {
        let item = Item {
            short_description: "abc".to_string(),
            price: Decimal::from_str_exact("100000000000000000000").expect("decimal"),
        };
        assert_eq!(description_points(&item), u64::MAX);
    }

    #[test]
    fn pairs_round_down() {
        assert_eq!(item_pair_points(0), 0);
        assert_eq!(item_pair_points(1), 0);
        assert_eq!(item_pair_points(2), 5);
        assert_eq!(item_pair_points(3), 5);
        assert_eq!(item_pair_points(4), 10);
    }

    #[test]
    fn afternoon_window_is_half_open() {
        assert_eq!(afternoon_points(13), 0);
        assert_eq!(afternoon_points(14), AFTERNOON_POINTS);
        assert_eq!(afternoon_points(15), AFTERNOON_POINTS);
        assert_eq!(afternoon_points(16), 0);
    }
}
