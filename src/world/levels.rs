//! Built-in campaign levels
//!
//! Bundled with the binary so the game runs without any files on disk.
//! Each entry is the same [`LevelSource`] shape that RON level files use;
//! external levels can be dropped in via [`super::load_level`].

use super::{Level, LevelError, LevelSource, Tuning};

/// Name and pattern of one built-in level.
struct BuiltinLevel {
    name: &'static str,
    rows: &'static [&'static str],
}

/// The campaign, in play order.
const CAMPAIGN: &[BuiltinLevel] = &[
    BuiltinLevel {
        name: "First Steps",
        rows: &[
            "____________________________________________",
            "____________________________________________",
            "____________________________________________",
            "____________________________________________",
            "_________________ooo___________________oo_d_",
            "_________________xxxxx________________xxxxxx",
            "______o______s___________o___________x______",
            "____xxxxx__xxxxx_______xxxx_________x_______",
            "_p_______e_________oo________e_____x________",
            "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
        ],
    },
    BuiltinLevel {
        name: "Mind the Gap",
        rows: &[
            "____________________________________________________",
            "____________________________________________________",
            "____________________________________________________",
            "____________________________________________________",
            "__________________o___s___o_______________________d_",
            "_________________xxxxxxxxxxx_____________________xxx",
            "_______oo_______________________oo______________x___",
            "______xxxx_____________________xxxx____________x____",
            "_p____________e____________o___________e______x_____",
            "xxxxxxxxxx___xxxxxxxxxxxxxxxxxxxxxx___xxxxxxxxxxxxxx",
        ],
    },
    BuiltinLevel {
        name: "The Climb",
        rows: &[
            "________________________________________",
            "______________d_________________________",
            "_____________xxx________________________",
            "__________oo____________________________",
            "__________xxx___________________________",
            "_______o____________________s___________",
            "______xxx________________xxxxxxx________",
            "____o________o______oo______________o___",
            "___xxx_____xxxx____xxxx____________xxx__",
            "_p_______e_______________e_____s________",
            "xxxxxxxxxxxxxxxx___xxxxxxxxxxxxxxxxxxxxx",
            "________________________________________",
        ],
    },
];

/// Parse and validate the built-in campaign.
///
/// A failure here is a programmer error in the patterns above, but it is
/// reported like any other level-load failure rather than panicking.
pub fn builtin_levels() -> Result<Vec<Level>, LevelError> {
    CAMPAIGN
        .iter()
        .map(|b| {
            Level::from_source(&LevelSource {
                name: b.name.to_string(),
                rows: b.rows.iter().map(|r| r.to_string()).collect(),
                tuning: Tuning::default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_levels_are_valid() {
        let levels = builtin_levels().unwrap();
        assert_eq!(levels.len(), 3);
        for level in &levels {
            assert!(level.width > 0);
            assert!(!level.coin_spawns.is_empty());
            assert!(!level.enemy_spawns.is_empty());
        }
    }

    #[test]
    fn test_campaign_is_wider_than_the_viewport() {
        // Every level scrolls: content extends past one 800px screen
        for level in builtin_levels().unwrap() {
            assert!(level.pixel_width() > 800.0, "level '{}' does not scroll", level.name);
        }
    }
}
