//! The built-in command catalog.
//!
//! Every handler receives the parsed flags and positional arguments, writes
//! through the session's scheduler, and surfaces every failure as text.

mod alignment;

use std::path::PathBuf;

use serde_json::Value;

use crate::dice;
use crate::parse::Flags;
use crate::resolve::{render_value, Command};
use crate::session::Session;
use crate::skills;
use crate::store::{parse_modifier, Modifier};
use crate::style;

/// The standard command set, merged into the resolver's registry at startup.
pub fn catalog() -> Vec<Command> {
    vec![
        Command {
            name: "alignment",
            usage: alignment::USAGE,
            run: alignment::run,
        },
        Command {
            name: "connect",
            usage: CONNECT_USAGE,
            run: connect,
        },
        Command {
            name: "exit",
            usage: "Leave the terminal",
            run: exit,
        },
        Command {
            name: "features",
            usage: FEATURES_USAGE,
            run: features,
        },
        Command {
            name: "gold",
            usage: GOLD_USAGE,
            run: gold,
        },
        Command {
            name: "hp",
            usage: HP_USAGE,
            run: hp,
        },
        Command {
            name: "implants",
            usage: "List implants and their remaining charges",
            run: implants,
        },
        Command {
            name: "proficiencies",
            usage: "List everything the character is proficient in",
            run: proficiencies,
        },
        Command {
            name: "proficiency_bonus",
            usage: "Display the proficiency bonus for the current level",
            run: proficiency_bonus,
        },
        Command {
            name: "roll",
            usage: ROLL_USAGE,
            run: roll,
        },
        Command {
            name: "save",
            usage: SAVE_USAGE,
            run: save,
        },
        Command {
            name: "stats",
            usage: "Display the six ability scores and their modifiers",
            run: stats,
        },
    ]
}

const CONNECT_USAGE: &str = r#"
Roll a Computers check to break into a corp network

connect        Roll and show the total
connect small  Roll against a small corp (also: medium, large, huge)
"#;

const FEATURES_USAGE: &str = r#"
Display class features

features        List the character's features
features <name> Describe one feature
"#;

const GOLD_USAGE: &str = r#"
Display or modify the character's gold

gold      Display current gold
gold +10  Gain 10 gold
gold -10  Spend 10 gold
gold 100  Set gold to exactly 100
"#;

const HP_USAGE: &str = r#"
Display or modify the character's hit points

hp      Display current and max HP
hp +5   Heal 5 HP (capped at max)
hp -5   Take 5 damage
hp 20   Set current HP to exactly 20
"#;

const ROLL_USAGE: &str = r#"
Roll a d20, optionally against a stat or skill

roll            Plain luck roll
roll dex        Roll with the dexterity modifier
roll athletics  Roll with the strength modifier and proficiency
"#;

const SAVE_USAGE: &str = r#"
Save the character

save         Save to the file that was opened
save <path>  Save to a new file, which becomes the default
"#;

/// Sign-aware, zero-padded three-digit score used by `stats`.
fn format_score(score: i64) -> String {
    let sign = if score < 0 { '-' } else { ' ' };
    format!("{sign}{:03}", score.abs())
}

fn format_modifier(modifier: i64) -> String {
    if modifier >= 0 {
        format!(" {modifier}")
    } else {
        modifier.to_string()
    }
}

fn stats(session: &mut Session, _flags: &Flags, _args: &[String]) {
    const ABILITIES: [&str; 6] = [
        "strength",
        "dexterity",
        "constitution",
        "intelligence",
        "wisdom",
        "charisma",
    ];

    for ability in ABILITIES {
        let score = session.store.get_i64(ability).unwrap_or(0);
        let mut label = ability.to_string();
        if let Some(first) = label.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        session.out.write(&format!(
            "{:<13} {} -   {}",
            format!("{label}:"),
            format_score(score),
            format_modifier(skills::ability_modifier(score))
        ));
    }
}

fn roll(session: &mut Session, _flags: &Flags, args: &[String]) {
    let Some(given) = args.first() else {
        session.out.write(&format!("Luck: {}", dice::d20()));
        return;
    };

    match skills::lookup(&session.store, given) {
        Err(err) => {
            session.out.write(&err.to_string());
        }
        Ok(info) => {
            let r = i64::from(dice::d20());
            let m = info.modifier;
            let p = info.proficiency_bonus;
            let line = if p != 0 {
                format!("R:{r} + M:{m} + P:{p} = {}", r + m + p)
            } else {
                format!("R:{r} + M:{m} = {}", r + m)
            };
            session.out.write(&line);
        }
    }
}

fn gold(session: &mut Session, _flags: &Flags, args: &[String]) {
    let current = session.store.get_i64("gold").unwrap_or(0);

    let Some(raw) = args.first() else {
        session
            .out
            .write(&format!("GP: {}", style::yellow(&current.to_string())));
        return;
    };

    match parse_modifier(raw) {
        Some(Modifier::Absolute(value)) => {
            session.out.write(&format!("Previous GP: {current}"));
            session.store.set("gold", Value::from(value));
            session
                .out
                .write(&format!("GP: {}", style::yellow(&value.to_string())));
        }
        Some(Modifier::Delta(delta)) => {
            if delta >= 0 {
                session.out.write(&format!("{current} + {delta}"));
            } else {
                session.out.write(&format!("{current} - {}", -delta));
            }
            let total = current + delta;
            session.store.set("gold", Value::from(total));
            session
                .out
                .write(&format!("GP: {}", style::yellow(&total.to_string())));
        }
        None => {
            session.out.write(&format!(
                "Unknown modifier: {raw}. Expected similar to: -10 or +23"
            ));
        }
    }
}

/// `current/max`, with the current value colored by how hurt the character
/// is: green above 75 %, yellow above 40 %, red below.
fn format_hp(hp: i64, max: i64) -> String {
    let shown = hp.to_string();
    let colored = if hp * 4 >= max * 3 {
        style::green(&shown)
    } else if hp * 10 >= max * 4 {
        style::yellow(&shown)
    } else {
        style::red(&shown)
    };
    format!("{colored}/{max}")
}

fn hp(session: &mut Session, _flags: &Flags, args: &[String]) {
    let current = session.store.get_i64("current_hp").unwrap_or(0);
    let max = session.store.get_i64("max_hp").unwrap_or(0);
    let temporary = session.store.get_i64("temporary_hp").unwrap_or(0);

    let Some(raw) = args.first() else {
        let active = current + temporary;
        let temp = if temporary != 0 {
            format!(" (+{temporary})")
        } else {
            String::new()
        };
        session
            .out
            .write(&format!("{}{temp}", format_hp(active, max)));
        return;
    };

    match parse_modifier(raw) {
        Some(Modifier::Absolute(value)) => {
            session
                .out
                .write(&format!("Previous HP: {}", format_hp(current, max)));
            session.store.set("current_hp", Value::from(value));
            session
                .out
                .write(&format!("HP: {}", format_hp(value, max)));
        }
        Some(Modifier::Delta(delta)) => {
            if delta >= 0 {
                session.out.write(&format!("{current} + {delta}"));
            } else {
                session.out.write(&format!("{current} - {}", -delta));
            }
            // Healing never exceeds max HP.
            let total = (current + delta).min(max);
            session.store.set("current_hp", Value::from(total));
            session
                .out
                .write(&format!("HP: {}", format_hp(total, max)));
        }
        None => {
            session.out.write(&format!(
                "Unknown modifier: {raw}. Expected similar to: -10 or +23"
            ));
        }
    }
}

fn features(session: &mut Session, _flags: &Flags, args: &[String]) {
    let Some(name) = args.first() else {
        let text = session
            .store
            .get("features")
            .map(render_value)
            .unwrap_or_else(|| "--empty--".to_string());
        session.out.write(&text);
        return;
    };

    let description = session
        .store
        .class_info()
        .and_then(|info| info.features.get(name.as_str()))
        .map(|feature| feature.description.clone());
    match description {
        None => {
            session.out.write(&format!("Unknown feature: {name}"));
        }
        Some(lines) => {
            for line in &lines {
                session.out.fast(line);
            }
        }
    }
}

fn proficiencies(session: &mut Session, _flags: &Flags, _args: &[String]) {
    session.out.write(&session.store.proficiencies().join("\n"));
}

fn proficiency_bonus(session: &mut Session, _flags: &Flags, _args: &[String]) {
    let bonus = session.store.proficiency_bonus();
    session.out.write(&bonus.to_string());
}

fn implants(session: &mut Session, _flags: &Flags, _args: &[String]) {
    let implants = session
        .store
        .get("implants")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if implants.is_empty() {
        session.out.write("--empty--");
        return;
    }
    for implant in &implants {
        let name = implant
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let charges = implant.get("charges").and_then(Value::as_i64).unwrap_or(0);
        session.out.write(&format!("{name} - {charges} charges"));
    }
}

fn connect(session: &mut Session, _flags: &Flags, args: &[String]) {
    let result = i64::from(dice::d20());
    let bonus = skills::proficiency_bonus_for(&session.store, "Computers");
    let total = result + bonus;

    if result <= 1 {
        session.out.critical_fail();
        return;
    }
    if result >= 20 {
        session.out.critical_success();
        return;
    }

    let Some(corp) = args.first() else {
        session.out.write(&format!("{result} + {bonus} = {total}"));
        return;
    };

    let corp = corp.to_lowercase();
    let min_required = match corp.as_str() {
        "small" | "medium" => 15,
        "large" | "huge" => 10,
        _ => {
            session.out.write(&format!(
                "Unknown corp type: {corp}. Try small, medium, large, or huge"
            ));
            return;
        }
    };

    if total < min_required {
        session.out.fail("FAIL");
    } else {
        session.out.success("SUCCESS");
    }
}

fn save(session: &mut Session, _flags: &Flags, args: &[String]) {
    let path = args.first().map(PathBuf::from);
    match session.store.save(path.as_deref()) {
        Ok(saved) => {
            session.out.ok(&format!("Saved to {}", saved.display()));
        }
        Err(err) => {
            session.out.error(&format!("Save failed: {err}"));
        }
    }
}

fn exit(session: &mut Session, _flags: &Flags, _args: &[String]) {
    session.request_exit();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_session, CaptureWriter};

    async fn run_line(session: &mut Session, cap: &CaptureWriter, line: &str) -> String {
        cap.clear();
        session.handle_line(line);
        session.out.flushed().await;
        cap.plain()
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(18), " 018");
        assert_eq!(format_score(8), " 008");
        assert_eq!(format_score(123), " 123");
        assert_eq!(format_score(-4), "-004");
    }

    #[test]
    fn modifier_formatting() {
        assert_eq!(format_modifier(4), " 4");
        assert_eq!(format_modifier(0), " 0");
        assert_eq!(format_modifier(-1), "-1");
    }

    #[tokio::test(start_paused = true)]
    async fn stats_lists_all_six_abilities() {
        let (mut session, cap) = test_session();
        let text = run_line(&mut session, &cap, "stats").await;
        assert!(text.contains("Strength:      018 -    4"));
        assert!(text.contains("Intelligence:  008 -   -1"));
        assert!(text.contains("Charisma:"));
        assert_eq!(text.lines().count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn gold_displays_and_modifies() {
        let (mut session, cap) = test_session();

        let text = run_line(&mut session, &cap, "gold").await;
        assert_eq!(text, "GP: 50\n");

        let text = run_line(&mut session, &cap, "gold +25").await;
        assert_eq!(text, "50 + 25\nGP: 75\n");
        assert_eq!(session.store.get_i64("gold"), Some(75));

        let text = run_line(&mut session, &cap, "gold -10").await;
        assert_eq!(text, "75 - 10\nGP: 65\n");

        let text = run_line(&mut session, &cap, "gold 100").await;
        assert_eq!(text, "Previous GP: 65\nGP: 100\n");

        let text = run_line(&mut session, &cap, "gold lots").await;
        assert!(text.contains("Unknown modifier: lots"));
        assert_eq!(session.store.get_i64("gold"), Some(100));
    }

    #[tokio::test(start_paused = true)]
    async fn hp_clamps_healing_to_max() {
        let (mut session, cap) = test_session();

        // Sample character: 24/30.
        let text = run_line(&mut session, &cap, "hp +20").await;
        assert!(text.contains("24 + 20"));
        assert!(text.contains("HP: 30/30"));
        assert_eq!(session.store.get_i64("current_hp"), Some(30));

        let text = run_line(&mut session, &cap, "hp -12").await;
        assert!(text.contains("30 - 12"));
        assert!(text.contains("HP: 18/30"));
    }

    #[tokio::test(start_paused = true)]
    async fn hp_display_includes_temporary_points() {
        let (mut session, cap) = test_session();
        session.store.set("temporary_hp", serde_json::json!(5));
        let text = run_line(&mut session, &cap, "hp").await;
        assert_eq!(text, "29/30 (+5)\n");
    }

    #[tokio::test(start_paused = true)]
    async fn roll_reports_modifier_and_proficiency() {
        let (mut session, cap) = test_session();

        let text = run_line(&mut session, &cap, "roll").await;
        assert!(text.starts_with("Luck: "));

        // Athletics: proficient, str modifier 4, bonus 2.
        let text = run_line(&mut session, &cap, "roll athletics").await;
        assert!(text.contains("+ M:4 + P:2 ="));

        // Bare stat: no proficiency term.
        let text = run_line(&mut session, &cap, "roll dex").await;
        assert!(text.contains("+ M:2 ="));
        assert!(!text.contains("P:"));

        let text = run_line(&mut session, &cap, "roll bogus").await;
        assert_eq!(text, "Unknown stat: bogus\n");
    }

    #[tokio::test(start_paused = true)]
    async fn proficiency_commands() {
        let (mut session, cap) = test_session();

        let text = run_line(&mut session, &cap, "proficiencies").await;
        assert_eq!(text, "Athletics\nComputers\nIntimidation\n");

        let text = run_line(&mut session, &cap, "proficiency_bonus").await;
        assert_eq!(text, "2\n");
    }

    #[tokio::test(start_paused = true)]
    async fn implants_list_names_and_charges() {
        let (mut session, cap) = test_session();
        let text = run_line(&mut session, &cap, "implants").await;
        assert_eq!(text, "Neural Link - 3 charges\nSmartgun Port - 1 charges\n");
    }

    #[tokio::test(start_paused = true)]
    async fn connect_handles_unknown_corp_types() {
        let (mut session, cap) = test_session();
        // Whatever the roll, an unknown corp type must either report the
        // unknown type or short-circuit on a critical.
        let text = run_line(&mut session, &cap, "connect mega").await;
        assert!(
            text.contains("Unknown corp type: mega")
                || text.contains("CRITICAL"),
            "unexpected output: {text}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn features_lists_and_describes() {
        let (mut session, cap) = test_session();

        let text = run_line(&mut session, &cap, "features").await;
        assert_eq!(text, "Rage\nReckless Attack\n");

        let text = run_line(&mut session, &cap, "features Rage").await;
        assert_eq!(text, "Enter a frenzy in battle.\nLasts ten rounds.\n");

        let text = run_line(&mut session, &cap, "features Berserk").await;
        assert_eq!(text, "Unknown feature: Berserk\n");
    }

    #[tokio::test(start_paused = true)]
    async fn save_reports_failures_as_text() {
        let (mut session, cap) = test_session();
        // The fixture store has no backing file.
        let text = run_line(&mut session, &cap, "save").await;
        assert!(text.contains("Save failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn save_writes_to_a_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let (mut session, cap) = test_session();

        let line = format!("save {}", path.display());
        let text = run_line(&mut session, &cap, &line).await;
        assert!(text.contains("Saved to"));
        assert!(path.exists());
    }
}
