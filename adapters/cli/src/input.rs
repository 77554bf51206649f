//! Translation of typed lines into player actions.

use hellas_quest_core::{CategoryFilter, Character, Difficulty, Phase, PowerUpKind};
use hellas_quest_rendering::PlayerAction;

/// Outcome of parsing one line typed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Parsed {
    /// The line maps onto a player action.
    Action(PlayerAction),
    /// The player asked to close the program.
    Exit,
    /// Nothing to do beyond refreshing the screen.
    Idle,
    /// The line does not mean anything in the current phase.
    Unknown,
}

const CATEGORY_KEYWORDS: [(&str, CategoryFilter); 4] = [
    ("all", CategoryFilter::All),
    ("rise", CategoryFilter::Rise),
    ("golden", CategoryFilter::Golden),
    ("decline", CategoryFilter::Decline),
];

const POWER_UP_KEYWORDS: [(&str, &str, PowerUpKind); 4] = [
    ("h", "hint", PowerUpKind::Hint),
    ("s", "strike", PowerUpKind::Strike),
    ("t", "freeze", PowerUpKind::TimeFreeze),
    ("d", "double", PowerUpKind::DoublePoints),
];

/// Parses `line` as typed while the session is in `phase`.
pub(crate) fn parse_line(line: &str, phase: Phase) -> Parsed {
    let word = line.trim().to_lowercase();
    if word == "exit" {
        return Parsed::Exit;
    }

    let action = match phase {
        Phase::DifficultySelect => {
            pick(&word, &Difficulty::ALL, |d| d.label()).map(PlayerAction::ChooseDifficulty)
        }
        Phase::CategorySelect => menu_index(&word, CATEGORY_KEYWORDS.len())
            .map(|index| CATEGORY_KEYWORDS[index].1)
            .or_else(|| {
                CATEGORY_KEYWORDS
                    .iter()
                    .find(|(keyword, _)| *keyword == word)
                    .map(|(_, category)| *category)
            })
            .map(PlayerAction::ChooseCategory),
        Phase::CharacterSelect => {
            pick(&word, &Character::ALL, |c| c.name()).map(PlayerAction::ChooseCharacter)
        }
        Phase::Intro => match word.as_str() {
            "" | "start" => Some(PlayerAction::BeginQuest),
            _ => None,
        },
        Phase::QuestionActive | Phase::Feedback => quest_action(&word),
        Phase::GameOver => match word.as_str() {
            "again" | "restart" => Some(PlayerAction::PlayAgain),
            _ => None,
        },
    };

    match action {
        Some(action) => Parsed::Action(action),
        None if word.is_empty() => Parsed::Idle,
        None => Parsed::Unknown,
    }
}

fn quest_action(word: &str) -> Option<PlayerAction> {
    if word == "quit" {
        return Some(PlayerAction::Quit);
    }
    if let Some(index) = menu_index(word, usize::MAX) {
        return Some(PlayerAction::Answer(index));
    }
    POWER_UP_KEYWORDS
        .iter()
        .find(|(short, long, _)| word == *short || word == *long)
        .map(|(_, _, kind)| PlayerAction::UsePowerUp(*kind))
}

fn pick<T: Copy>(word: &str, items: &[T], name: impl Fn(T) -> &'static str) -> Option<T> {
    if let Some(index) = menu_index(word, items.len()) {
        return Some(items[index]);
    }
    items
        .iter()
        .copied()
        .find(|item| name(*item).eq_ignore_ascii_case(word))
}

/// Converts a 1-based menu number into an index below `len`.
fn menu_index(word: &str, len: usize) -> Option<usize> {
    let number: usize = word.parse().ok()?;
    let index = number.checked_sub(1)?;
    (index < len).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menus_accept_numbers_and_names() {
        assert_eq!(
            parse_line("3\n", Phase::DifficultySelect),
            Parsed::Action(PlayerAction::ChooseDifficulty(Difficulty::Hard))
        );
        assert_eq!(
            parse_line("Easy", Phase::DifficultySelect),
            Parsed::Action(PlayerAction::ChooseDifficulty(Difficulty::Easy))
        );
        assert_eq!(
            parse_line("golden", Phase::CategorySelect),
            Parsed::Action(PlayerAction::ChooseCategory(CategoryFilter::Golden))
        );
        assert_eq!(
            parse_line("1", Phase::CategorySelect),
            Parsed::Action(PlayerAction::ChooseCategory(CategoryFilter::All))
        );
        assert_eq!(
            parse_line("athena", Phase::CharacterSelect),
            Parsed::Action(PlayerAction::ChooseCharacter(Character::Athena))
        );
        assert_eq!(
            parse_line("5", Phase::CharacterSelect),
            Parsed::Action(PlayerAction::ChooseCharacter(Character::Achilles))
        );
    }

    #[test]
    fn out_of_range_numbers_are_unknown() {
        assert_eq!(parse_line("0", Phase::DifficultySelect), Parsed::Unknown);
        assert_eq!(parse_line("4", Phase::DifficultySelect), Parsed::Unknown);
        assert_eq!(parse_line("6", Phase::CharacterSelect), Parsed::Unknown);
    }

    #[test]
    fn quest_lines_map_to_answers_and_power_ups() {
        assert_eq!(
            parse_line("2", Phase::QuestionActive),
            Parsed::Action(PlayerAction::Answer(1))
        );
        assert_eq!(
            parse_line(" freeze ", Phase::QuestionActive),
            Parsed::Action(PlayerAction::UsePowerUp(PowerUpKind::TimeFreeze))
        );
        assert_eq!(
            parse_line("d", Phase::Feedback),
            Parsed::Action(PlayerAction::UsePowerUp(PowerUpKind::DoublePoints))
        );
        assert_eq!(
            parse_line("quit", Phase::QuestionActive),
            Parsed::Action(PlayerAction::Quit)
        );
        assert_eq!(parse_line("", Phase::QuestionActive), Parsed::Idle);
    }

    #[test]
    fn intro_and_game_over_prompts() {
        assert_eq!(
            parse_line("", Phase::Intro),
            Parsed::Action(PlayerAction::BeginQuest)
        );
        assert_eq!(
            parse_line("again", Phase::GameOver),
            Parsed::Action(PlayerAction::PlayAgain)
        );
        assert_eq!(parse_line("hint", Phase::GameOver), Parsed::Unknown);
    }

    #[test]
    fn exit_works_everywhere() {
        assert_eq!(parse_line("EXIT", Phase::DifficultySelect), Parsed::Exit);
        assert_eq!(parse_line("exit", Phase::QuestionActive), Parsed::Exit);
    }
}
