//! Model markup to Telegram Markdown rewriting.
//!
//! Models answer in CommonMark-ish markup; Telegram's legacy Markdown only
//! knows single-asterisk bold and underscore italics. The rewrite is a fixed
//! sequence of regex substitutions. The heading patterns are lazy and
//! unanchored on purpose: the captured group is always empty, so only the
//! `## ` marker is replaced and the heading text follows it untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Full-width separator replacing a `---` line.
pub const SEPARATOR: &str = "▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬▬";

pub const H3_EMOJI: &str = "🟢";
pub const H2_EMOJI: &str = "🔷";
pub const STAR_BULLET_EMOJI: &str = "🐾";
pub const DOT_BULLET_EMOJI: &str = "✨";

static H3: LazyLock<Regex> = LazyLock::new(|| compile(r"### (.*?)"));
static H2: LazyLock<Regex> = LazyLock::new(|| compile(r"## (.*?)"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"_(.*?)_"));
static STAR_BULLET: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^\* (.*?)$"));
static DOT_BULLET: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^• (.*?)$"));
static RULE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^---$"));

fn compile(pattern: &str) -> Regex {
    // Patterns are literals above; failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid formatter pattern {pattern:?}: {e}"))
}

/// Rewrite a model reply into Telegram legacy Markdown.
///
/// Substitutions run in a fixed order: level-3 headings, level-2 headings,
/// bold, italics, `*` bullets, `•` bullets, horizontal rules.
pub fn format_reply(text: &str) -> String {
    let text = H3.replace_all(text, format!("{H3_EMOJI} *${{1}}*").as_str());
    let text = H2.replace_all(&text, format!("{H2_EMOJI} *${{1}}*").as_str());
    let text = BOLD.replace_all(&text, "*${1}*");
    let text = ITALIC.replace_all(&text, "_${1}_");
    let text = STAR_BULLET.replace_all(&text, format!("{STAR_BULLET_EMOJI} ${{1}}").as_str());
    let text = DOT_BULLET.replace_all(&text, format!("{DOT_BULLET_EMOJI} ${{1}}").as_str());
    let text = RULE.replace_all(&text, SEPARATOR);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Hello there.\nNothing special here, just 2 lines.";
        assert_eq!(format_reply(text), text);
    }

    #[test]
    fn headings_replace_only_the_marker() {
        assert_eq!(format_reply("## Hi"), "🔷 **Hi");
        assert_eq!(format_reply("### Details"), "🟢 **Details");
    }

    #[test]
    fn level_three_is_not_mistaken_for_level_two() {
        let out = format_reply("### Deep\n## Shallow");
        assert_eq!(out, "🟢 **Deep\n🔷 **Shallow");
    }

    #[test]
    fn heading_marker_matches_mid_line() {
        assert_eq!(format_reply("see ## here"), "see 🔷 **here");
    }

    #[test]
    fn double_asterisk_bold_becomes_single() {
        assert_eq!(
            format_reply("this is **very** and **more** bold"),
            "this is *very* and *more* bold"
        );
    }

    #[test]
    fn bold_does_not_span_lines() {
        let text = "**open\nclose**";
        assert_eq!(format_reply(text), text);
    }

    #[test]
    fn italics_are_preserved() {
        assert_eq!(format_reply("an _italic_ word"), "an _italic_ word");
    }

    #[test]
    fn bullets_get_emoji() {
        assert_eq!(format_reply("* one\n* two"), "🐾 one\n🐾 two");
        assert_eq!(format_reply("• first\n• second"), "✨ first\n✨ second");
    }

    #[test]
    fn indented_star_is_not_a_bullet() {
        assert_eq!(format_reply("  * nested"), "  * nested");
    }

    #[test]
    fn rule_becomes_separator() {
        assert_eq!(format_reply("a\n---\nb"), format!("a\n{SEPARATOR}\nb"));
        assert_eq!(SEPARATOR.chars().count(), 24);
    }

    #[test]
    fn rule_must_be_the_whole_line() {
        assert_eq!(format_reply("a --- b"), "a --- b");
        assert_eq!(format_reply("----"), "----");
    }

    #[test]
    fn mixed_reply() {
        let out = format_reply("## Hi\n* one\n* two");
        assert_eq!(out, "🔷 **Hi\n🐾 one\n🐾 two");
    }
}
