//! Domain types for the skill-exchange platform.

use chrono::NaiveDate;

/// A skill session someone offers in exchange for credits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillListing {
    pub title: String,
    pub mentor: String,
    pub category: Category,
    pub credits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Craft,
    Language,
    Music,
    Technology,
}

impl Category {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Craft => "craft",
            Self::Language => "language",
            Self::Music => "music",
            Self::Technology => "technology",
        }
    }
}

/// The signed-in user's account.
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub joined: NaiveDate,
    pub balance: u32,
}

impl Profile {
    /// Spend credits if the balance covers it.
    pub const fn try_spend(&mut self, credits: u32) -> bool {
        if let Some(rest) = self.balance.checked_sub(credits) {
            self.balance = rest;
            true
        } else {
            false
        }
    }
}

/// Demo catalog shown until the client talks to a real backend.
#[must_use]
pub fn seed_catalog() -> Vec<SkillListing> {
    let listing = |title: &str, mentor: &str, category, credits| SkillListing {
        title: title.to_string(),
        mentor: mentor.to_string(),
        category,
        credits,
    };
    vec![
        listing("Sourdough basics", "marta", Category::Craft, 12),
        listing("Conversational Spanish", "diego", Category::Language, 8),
        listing("Intro to jazz piano", "yuki", Category::Music, 15),
        listing("Rust for beginners", "ada", Category::Technology, 20),
        listing("Bicycle maintenance", "sven", Category::Craft, 10),
        listing("Japanese calligraphy", "rin", Category::Craft, 14),
        listing("SQL fundamentals", "omar", Category::Technology, 16),
        listing("Guitar chords 101", "lena", Category::Music, 9),
    ]
}

#[must_use]
pub fn seed_profile() -> Profile {
    Profile {
        username: "alice".to_string(),
        joined: NaiveDate::from_ymd_opt(2024, 3, 17).unwrap_or_default(),
        balance: 42,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spending_respects_the_balance() {
        let mut profile = seed_profile();
        let start = profile.balance;

        assert!(profile.try_spend(10));
        assert_eq!(profile.balance, start - 10);

        assert!(!profile.try_spend(start));
        assert_eq!(profile.balance, start - 10, "failed spend changes nothing");
    }
}
