//! Achievement definitions and unlock rules.
//!
//! Achievements are simple thresholds over the progress counters plus a few
//! hidden ones with their own conditions. The table is static; unlock state
//! is persisted by the tracker.

use serde::{Deserialize, Serialize};

use super::evolution::EvolutionStage;

/// Achievement grouping, which also selects the counter it thresholds on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Evolution,
    Collection,
    Search,
    Download,
    Hidden,
}

/// A single achievement definition.
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    /// Threshold on the category's counter.
    pub requirement: u64,
    /// Hidden achievements are not shown until unlocked.
    pub hidden: bool,
    /// Theme unlocked alongside, if any.
    pub unlocks_theme: Option<&'static str>,
    /// Evolution stage this achievement marks, if any.
    pub evolution_stage: Option<EvolutionStage>,
}

const fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    requirement: u64,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        category,
        requirement,
        hidden: false,
        unlocks_theme: None,
        evolution_stage: None,
    }
}

/// The full achievement table.
pub const ACHIEVEMENTS: &[Achievement] = &[
    // Evolution
    Achievement {
        id: "morpho_grub",
        name: "Morpho Awakens",
        description: "The grub begins its journey - Add your first book",
        category: AchievementCategory::Evolution,
        requirement: 1,
        hidden: false,
        unlocks_theme: Some("morpho"),
        evolution_stage: Some(EvolutionStage::Grub),
    },
    Achievement {
        id: "morpho_cocoon",
        name: "Transformation Begins",
        description: "Enter the cocoon stage - Collect 50 books",
        category: AchievementCategory::Evolution,
        requirement: 50,
        hidden: false,
        unlocks_theme: Some("cocoon"),
        evolution_stage: Some(EvolutionStage::Cocoon),
    },
    Achievement {
        id: "morpho_butterfly",
        name: "Metamorphosis Complete",
        description: "The butterfly emerges! Collect 100 books",
        category: AchievementCategory::Evolution,
        requirement: 100,
        hidden: false,
        unlocks_theme: Some("butterfly"),
        evolution_stage: Some(EvolutionStage::Butterfly),
    },
    // Collection
    achievement(
        "collector_10",
        "Modest Collection",
        "Collect 10 books",
        AchievementCategory::Collection,
        10,
    ),
    achievement(
        "collector_25",
        "Growing Library",
        "Collect 25 books",
        AchievementCategory::Collection,
        25,
    ),
    achievement(
        "collector_50",
        "Book Lover",
        "Collect 50 books",
        AchievementCategory::Collection,
        50,
    ),
    achievement(
        "collector_200",
        "Library Curator",
        "Collect 200 books",
        AchievementCategory::Collection,
        200,
    ),
    achievement(
        "collector_500",
        "Alexandria Reborn",
        "Collect 500 books",
        AchievementCategory::Collection,
        500,
    ),
    achievement(
        "collector_1000",
        "Master Librarian",
        "Collect 1,000 books",
        AchievementCategory::Collection,
        1000,
    ),
    // Search
    achievement(
        "first_search",
        "Explorer",
        "Perform your first search",
        AchievementCategory::Search,
        1,
    ),
    achievement(
        "search_10",
        "Book Hunter",
        "Perform 10 searches",
        AchievementCategory::Search,
        10,
    ),
    achievement(
        "search_100",
        "Treasure Seeker",
        "Perform 100 searches",
        AchievementCategory::Search,
        100,
    ),
    // Download
    achievement(
        "first_download",
        "Download Initiated",
        "Download your first book",
        AchievementCategory::Download,
        1,
    ),
    achievement(
        "download_10",
        "Avid Collector",
        "Download 10 books",
        AchievementCategory::Download,
        10,
    ),
    achievement(
        "download_50",
        "Data Hoarder",
        "Download 50 books",
        AchievementCategory::Download,
        50,
    ),
    achievement(
        "download_100",
        "Download Master",
        "Download 100 books",
        AchievementCategory::Download,
        100,
    ),
    // Hidden
    Achievement {
        id: "speed_demon",
        name: "Speed Demon",
        description: "Download 10 books in one hour",
        category: AchievementCategory::Hidden,
        requirement: 10,
        hidden: true,
        unlocks_theme: None,
        evolution_stage: None,
    },
    Achievement {
        id: "automation_wizard",
        name: "Automation Wizard",
        description: "Have 20 books monitored simultaneously",
        category: AchievementCategory::Hidden,
        requirement: 20,
        hidden: true,
        unlocks_theme: None,
        evolution_stage: None,
    },
];

/// Current user progress, assembled from persisted counters and library
/// statistics supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_books: u64,
    pub total_searches: u64,
    pub total_downloads: u64,
    #[serde(default)]
    pub monitored_books: u64,
    #[serde(default)]
    pub downloads_last_hour: u64,
    #[serde(default)]
    pub unlocked_achievements: Vec<String>,
}

/// Achievements newly earned by the given progress, in table order.
///
/// Already-unlocked achievements are never reported again.
pub fn check_achievements(progress: &UserProgress) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !progress.unlocked_achievements.iter().any(|id| id == a.id))
        .filter(|a| {
            match a.category {
                AchievementCategory::Evolution | AchievementCategory::Collection => {
                    progress.total_books >= a.requirement
                }
                AchievementCategory::Search => progress.total_searches >= a.requirement,
                AchievementCategory::Download => progress.total_downloads >= a.requirement,
                AchievementCategory::Hidden => match a.id {
                    "speed_demon" => progress.downloads_last_hour >= a.requirement,
                    "automation_wizard" => progress.monitored_books >= a.requirement,
                    _ => false,
                },
            }
        })
        .collect()
}
