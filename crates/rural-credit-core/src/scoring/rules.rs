//! Keyword and threshold tables behind the factor scorers.
//!
//! Free-text answers are matched case-insensitively. Each table is ordered
//! most specific first and only the first matching tier applies, so "good"
//! and "excellent" never stack.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Keyword appears starting at a word boundary ("farmers" matches
    /// "farmer", "irregular" does not match "regular").
    WordPrefix,
    /// Whole trimmed answer equals the keyword.
    Exact,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordTier {
    pub rule: &'static str,
    pub keywords: &'static [&'static str],
    pub mode: MatchMode,
    pub points: i32,
}

impl KeywordTier {
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| match self.mode {
            MatchMode::Exact => text == *k,
            MatchMode::WordPrefix => contains_at_word_start(text, k),
        })
    }
}

/// First tier matching the lower-cased text.
pub fn first_match<'a>(tiers: &'a [KeywordTier], text: &str) -> Option<&'a KeywordTier> {
    tiers.iter().find(|tier| tier.matches(text))
}

/// Highest threshold the value reaches, as `(rule, points)`.
pub fn threshold_points(
    table: &[(Decimal, i32, &'static str)],
    value: Decimal,
) -> Option<(&'static str, i32)> {
    table
        .iter()
        .find(|(min, _, _)| value >= *min)
        .map(|(_, points, rule)| (*rule, *points))
}

/// Answers that open with a refusal ("no", "not a member", "none yet").
pub fn is_negative(text: &str) -> bool {
    let first = text
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or("");
    NEGATIVE_WORDS.contains(&first)
}

pub fn contains_at_word_start(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

const NEGATIVE_WORDS: [&str; 8] = ["no", "none", "not", "never", "nil", "nothing", "don", "dont"];

// ---------------------------------------------------------------------------
// Income stability
// ---------------------------------------------------------------------------

pub const INCOME_BASE: i32 = 10;

pub const OCCUPATION_TIERS: &[KeywordTier] = &[
    KeywordTier {
        rule: "salaried_or_professional",
        keywords: &["government", "teacher", "clerk", "officer", "engineer", "doctor"],
        mode: MatchMode::WordPrefix,
        points: 40,
    },
    KeywordTier {
        rule: "business_owner",
        keywords: &["business", "shop", "trade", "trader", "entrepreneur"],
        mode: MatchMode::WordPrefix,
        points: 30,
    },
    KeywordTier {
        rule: "farming",
        keywords: &["farming", "farmer", "agricultur", "cultivat"],
        mode: MatchMode::WordPrefix,
        points: 25,
    },
    KeywordTier {
        rule: "casual_labour",
        keywords: &["labor", "labour", "worker", "daily"],
        mode: MatchMode::WordPrefix,
        points: 15,
    },
];

/// Declared occupation matching no tier.
pub const OCCUPATION_OTHER_POINTS: i32 = 10;

pub const INCOME_BRACKETS: &[(Decimal, i32, &str)] = &[
    (dec!(100_000), 25, "income_100k_plus"),
    (dec!(50_000), 20, "income_50k_plus"),
    (dec!(20_000), 15, "income_20k_plus"),
    (dec!(15_000), 10, "income_15k_plus"),
    (dec!(10_000), 5, "income_10k_plus"),
];

pub const SEASONAL_TIERS: &[KeywordTier] = &[
    KeywordTier {
        rule: "seasonal_variation",
        keywords: &["yes", "high", "significant"],
        mode: MatchMode::Exact,
        points: -5,
    },
    KeywordTier {
        rule: "stable_across_seasons",
        keywords: &["none", "no", "minimal", "low"],
        mode: MatchMode::Exact,
        points: 5,
    },
];

pub const SECONDARY_INCOME_POINTS: i32 = 10;

// ---------------------------------------------------------------------------
// Repayment history
// ---------------------------------------------------------------------------

pub const REPAYMENT_BASE: i32 = 40;

pub const REPAYMENT_TIERS: &[KeywordTier] = &[
    KeywordTier {
        rule: "no_history_declared",
        keywords: &["none", "no", "no history", "new_borrower", "new borrower", "never borrowed"],
        mode: MatchMode::Exact,
        points: 5,
    },
    KeywordTier {
        rule: "excellent_repayment",
        keywords: &["excellent", "perfect", "always on time", "outstanding"],
        mode: MatchMode::WordPrefix,
        points: 40,
    },
    KeywordTier {
        rule: "good_repayment",
        keywords: &["good", "regular", "no issues", "consistent"],
        mode: MatchMode::WordPrefix,
        points: 30,
    },
    KeywordTier {
        rule: "fair_repayment",
        keywords: &["fair", "occasional delay", "sometimes late"],
        mode: MatchMode::WordPrefix,
        points: 10,
    },
    KeywordTier {
        rule: "late_repayment",
        keywords: &["late", "missed", "delayed"],
        mode: MatchMode::WordPrefix,
        points: -15,
    },
    KeywordTier {
        rule: "poor_repayment",
        keywords: &["bad", "poor", "irregular", "default"],
        mode: MatchMode::WordPrefix,
        points: -30,
    },
];

pub const EXISTING_LOAN_TIERS: &[KeywordTier] = &[
    KeywordTier {
        rule: "no_existing_debt",
        keywords: &["no", "none", "nil"],
        mode: MatchMode::Exact,
        points: 10,
    },
    KeywordTier {
        rule: "manageable_existing_debt",
        keywords: &["small", "minor", "manageable", "one"],
        mode: MatchMode::WordPrefix,
        points: 5,
    },
    KeywordTier {
        rule: "heavy_existing_debt",
        keywords: &["large", "multiple", "heavy", "many"],
        mode: MatchMode::WordPrefix,
        points: -10,
    },
];

pub const BORROWING_EXPERIENCE_POINTS: i32 = 5;

// ---------------------------------------------------------------------------
// Social capital
// ---------------------------------------------------------------------------

pub const SOCIAL_BASE: i32 = 20;

pub const GROUP_TIERS: &[KeywordTier] = &[
    KeywordTier {
        rule: "named_group_membership",
        keywords: &[
            "shg",
            "self help",
            "self-help",
            "cooperative",
            "co-operative",
            "society",
            "sangha",
            "group",
            "association",
            "member",
        ],
        mode: MatchMode::WordPrefix,
        points: 35,
    },
    KeywordTier {
        rule: "group_membership",
        keywords: &["yes", "y"],
        mode: MatchMode::Exact,
        points: 30,
    },
];

pub const BANK_ACCOUNT_TIER: KeywordTier = KeywordTier {
    rule: "bank_account",
    keywords: &["have", "yes", "active", "account"],
    mode: MatchMode::WordPrefix,
    points: 25,
};

pub const PHONE_POINTS: i32 = 10;
pub const SMARTPHONE_POINTS: i32 = 10;

// ---------------------------------------------------------------------------
// Asset ownership
// ---------------------------------------------------------------------------

pub const ASSET_BASE: i32 = 10;
pub const LAND_OWNERSHIP_POINTS: i32 = 40;

/// Normalized acreage tiers.
pub const LAND_AREA_TIERS: &[(Decimal, i32, &str)] = &[
    (dec!(5), 25, "large_holding"),
    (dec!(2), 20, "medium_holding"),
    (dec!(1), 15, "small_holding"),
];

/// Holdings under one acre.
pub const MARGINAL_HOLDING_POINTS: i32 = 10;

pub const LAND_TYPE_TIERS: &[KeywordTier] = &[
    KeywordTier {
        rule: "commercial_land",
        keywords: &["commercial"],
        mode: MatchMode::WordPrefix,
        points: 15,
    },
    KeywordTier {
        rule: "residential_land",
        keywords: &["residential"],
        mode: MatchMode::WordPrefix,
        points: 12,
    },
    KeywordTier {
        rule: "agricultural_land",
        keywords: &["agricultur", "farm", "dry", "wet", "irrigated"],
        mode: MatchMode::WordPrefix,
        points: 10,
    },
];

pub const PUCCA_HOUSE_POINTS: i32 = 15;
pub const SEMI_PUCCA_HOUSE_POINTS: i32 = 10;
pub const KACHCHA_HOUSE_POINTS: i32 = 5;
pub const ELECTRICITY_POINTS: i32 = 5;

// ---------------------------------------------------------------------------
// Financial behaviour
// ---------------------------------------------------------------------------

pub const FINANCIAL_BASE: i32 = 20;

pub const SAVINGS_TIERS: &[(Decimal, i32, &str)] = &[
    (dec!(50_000), 40, "savings_50k_plus"),
    (dec!(20_000), 35, "savings_20k_plus"),
    (dec!(10_000), 30, "savings_10k_plus"),
    (dec!(5_000), 25, "savings_5k_plus"),
    (dec!(2_000), 20, "savings_2k_plus"),
];

/// Any positive monthly saving below the lowest tier.
pub const SMALL_SAVINGS_POINTS: i32 = 15;

/// Share of income left after expenses.
pub const SURPLUS_TIERS: &[(Decimal, i32, &str)] = &[
    (dec!(0.5), 20, "surplus_50pct_plus"),
    (dec!(0.3), 15, "surplus_30pct_plus"),
    (dec!(0.1), 10, "surplus_10pct_plus"),
];

/// Income above expenses by less than the lowest surplus tier.
pub const WITHIN_MEANS_POINTS: i32 = 5;

pub const BANK_RELATIONSHIP_POINTS: i32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_prefix_matching() {
        assert!(contains_at_word_start("farmers cooperative", "farmer"));
        assert!(!contains_at_word_start("irregular", "regular"));
        assert!(contains_at_word_start("semi-pucca", "pucca"));
        assert!(contains_at_word_start("yes - shg", "shg"));
    }

    #[test]
    fn test_irregular_is_poor_not_good() {
        let tier = first_match(REPAYMENT_TIERS, "irregular payments").unwrap();
        assert_eq!(tier.rule, "poor_repayment");
    }

    #[test]
    fn test_excellent_wins_over_good() {
        let tier = first_match(REPAYMENT_TIERS, "excellent, always good").unwrap();
        assert_eq!(tier.points, 40);
    }

    #[test]
    fn test_sometimes_late_is_fair() {
        let tier = first_match(REPAYMENT_TIERS, "sometimes late").unwrap();
        assert_eq!(tier.rule, "fair_repayment");
    }

    #[test]
    fn test_negative_answers() {
        assert!(is_negative("no"));
        assert!(is_negative("not a member of any group"));
        assert!(is_negative("none"));
        assert!(!is_negative("yes - farmers cooperative"));
        assert!(!is_negative("nominal member"));
        assert!(is_negative("don't have one"));
    }

    #[test]
    fn test_threshold_points_highest_first() {
        assert_eq!(
            threshold_points(INCOME_BRACKETS, dec!(15_000)),
            Some(("income_15k_plus", 10))
        );
        assert_eq!(threshold_points(INCOME_BRACKETS, dec!(9_999)), None);
        assert_eq!(
            threshold_points(INCOME_BRACKETS, dec!(250_000)),
            Some(("income_100k_plus", 25))
        );
    }

    #[test]
    fn test_occupation_tiers_strictly_ordered() {
        let points: Vec<i32> = OCCUPATION_TIERS.iter().map(|t| t.points).collect();
        assert!(points.windows(2).all(|w| w[0] > w[1]));
        assert!(points.iter().all(|p| *p > OCCUPATION_OTHER_POINTS));
    }
}
