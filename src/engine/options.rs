//! The selector option table and every option handler.
//!
//! Options are data-driven: one [`SelectorOption`] record per option id,
//! holding a plain handler function pointer, an applicability predicate over
//! the current parse state, and the translation key of its description. The
//! table is built once behind a `Lazy` and is read-only afterward; no
//! polymorphic handler objects, no runtime registration.
//!
//! Every handler follows the same shape: parse a typed value off the cursor,
//! merge it into `SelectorState`, extend the predicate by conjunction, mark
//! the matching selects/excludes flag. Failures roll the cursor back to the
//! value's start before propagating.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::grammar::SelectorParser;
use super::state::StateFlags;
use super::{debug_enabled, suggest_matching};
use crate::Sorter;
use crate::entity::{GameMode, read_resource_id};
use crate::error::{ParseError, ParseErrorKind};
use crate::range::{FloatRange, IntRange};
use crate::text::Message;

/// Handler signature shared by every option.
pub(crate) type OptionHandler = for<'a> fn(&mut SelectorParser<'a>) -> Result<(), ParseError>;

/// One registered selector option.
pub(crate) struct SelectorOption {
    pub id: &'static str,
    pub handler: OptionHandler,
    pub applicable: fn(&super::SelectorState) -> bool,
    /// Translation key of the option's description.
    pub description: &'static str,
}

static OPTIONS: Lazy<Vec<SelectorOption>> = Lazy::new(build_table);

fn build_table() -> Vec<SelectorOption> {
    vec![
        option! {
            id: "name",
            handler: handle_name,
            applicable: |s| !s.flags.contains(StateFlags::SELECTS_NAME),
            description: "argument.entity.options.name.description",
        },
        option! {
            id: "distance",
            handler: handle_distance,
            applicable: |s| s.distance.is_any(),
            description: "argument.entity.options.distance.description",
        },
        option! {
            id: "level",
            handler: handle_level,
            applicable: |s| s.level.is_any(),
            description: "argument.entity.options.level.description",
        },
        option! {
            id: "x",
            handler: handle_x,
            applicable: |s| s.x.is_none(),
            description: "argument.entity.options.x.description",
        },
        option! {
            id: "y",
            handler: handle_y,
            applicable: |s| s.y.is_none(),
            description: "argument.entity.options.y.description",
        },
        option! {
            id: "z",
            handler: handle_z,
            applicable: |s| s.z.is_none(),
            description: "argument.entity.options.z.description",
        },
        option! {
            id: "dx",
            handler: handle_dx,
            applicable: |s| s.dx.is_none(),
            description: "argument.entity.options.dx.description",
        },
        option! {
            id: "dy",
            handler: handle_dy,
            applicable: |s| s.dy.is_none(),
            description: "argument.entity.options.dy.description",
        },
        option! {
            id: "dz",
            handler: handle_dz,
            applicable: |s| s.dz.is_none(),
            description: "argument.entity.options.dz.description",
        },
        option! {
            id: "x_rotation",
            handler: handle_x_rotation,
            applicable: |s| s.pitch.is_any(),
            description: "argument.entity.options.x_rotation.description",
        },
        option! {
            id: "y_rotation",
            handler: handle_y_rotation,
            applicable: |s| s.yaw.is_any(),
            description: "argument.entity.options.y_rotation.description",
        },
        option! {
            id: "limit",
            handler: handle_limit,
            applicable: |s| {
                !s.flags.contains(StateFlags::SENDER_ONLY) && !s.flags.contains(StateFlags::HAS_LIMIT)
            },
            description: "argument.entity.options.limit.description",
        },
        option! {
            id: "sort",
            handler: handle_sort,
            applicable: |s| !s.flags.contains(StateFlags::SENDER_ONLY),
            description: "argument.entity.options.sort.description",
        },
        option! {
            id: "gamemode",
            handler: handle_gamemode,
            applicable: |s| !s.flags.contains(StateFlags::SELECTS_GAME_MODE),
            description: "argument.entity.options.gamemode.description",
        },
        option! {
            id: "team",
            handler: handle_team,
            applicable: |s| !s.flags.contains(StateFlags::SELECTS_TEAM),
            description: "argument.entity.options.team.description",
        },
        option! {
            id: "type",
            handler: handle_type,
            applicable: |s| !s.flags.contains(StateFlags::SELECTS_TYPE),
            description: "argument.entity.options.type.description",
        },
        option! {
            id: "tag",
            handler: handle_tag,
            applicable: |_| true,
            description: "argument.entity.options.tag.description",
        },
        option! {
            id: "scores",
            handler: handle_scores,
            applicable: |s| !s.flags.contains(StateFlags::SELECTS_SCORES),
            description: "argument.entity.options.scores.description",
        },
        option! {
            id: "advancements",
            handler: handle_advancements,
            applicable: |s| !s.flags.contains(StateFlags::SELECTS_ADVANCEMENTS),
            description: "argument.entity.options.advancements.description",
        },
    ]
}

/// Look up the handler for `key`, gating on applicability. On failure the
/// cursor is rolled back to `start` (the key's first character) and the error
/// is anchored there.
pub(crate) fn get_handler(
    parser: &mut SelectorParser,
    key: &str,
    start: usize,
) -> Result<OptionHandler, ParseError> {
    let Some(option) = OPTIONS.iter().find(|o| o.id == key) else {
        parser.cursor.set_cursor(start);
        return Err(ParseError::at_pos(
            ParseErrorKind::UnknownOption(key.to_string()),
            &parser.cursor,
            start,
        ));
    };
    if !(option.applicable)(&parser.state) {
        parser.cursor.set_cursor(start);
        return Err(ParseError::at_pos(
            ParseErrorKind::InapplicableOption(key.to_string()),
            &parser.cursor,
            start,
        ));
    }
    if debug_enabled() {
        eprintln!("[selector:option] id=\"{}\" at={}", option.id, start);
    }
    Ok(option.handler)
}

/// Options still meaningful given the current state, with their descriptions.
/// Drives suggestion filtering.
pub(crate) fn suggestable(state: &super::SelectorState) -> Vec<(&'static str, Message)> {
    OPTIONS
        .iter()
        .filter(|o| (o.applicable)(state))
        .map(|o| (o.id, Message::translatable(o.description)))
        .collect()
}

// --- Handlers ----------------------------------------------------------------

fn handle_name(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    let negated = p.read_negation();
    let name = p.cursor.read_string()?;
    if p.state.flags.contains(StateFlags::EXCLUDES_NAME) && !negated {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(
            ParseErrorKind::InapplicableOption("name".to_string()),
            &p.cursor,
            start,
        ));
    }
    p.state.flags |= if negated { StateFlags::EXCLUDES_NAME } else { StateFlags::SELECTS_NAME };
    p.state.and_predicate(move |entity| (entity.display_name() == name) != negated);
    Ok(())
}

fn handle_distance(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    let range = FloatRange::parse(&mut p.cursor)?;
    if range.min().is_some_and(|v| v < 0.0) || range.max().is_some_and(|v| v < 0.0) {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::NegativeDistance, &p.cursor, start));
    }
    p.state.distance = range;
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    Ok(())
}

fn handle_level(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    let range = IntRange::parse(&mut p.cursor)?;
    if range.min().is_some_and(|v| v < 0) || range.max().is_some_and(|v| v < 0) {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::NegativeLevel, &p.cursor, start));
    }
    p.state.level = range;
    p.state.flags.remove(StateFlags::INCLUDES_NON_PLAYERS);
    Ok(())
}

// Each positional option assigns its own field.

fn handle_x(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    p.state.x = Some(p.cursor.read_float()?);
    Ok(())
}

fn handle_y(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    p.state.y = Some(p.cursor.read_float()?);
    Ok(())
}

fn handle_z(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    p.state.z = Some(p.cursor.read_float()?);
    Ok(())
}

fn handle_dx(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    p.state.dx = Some(p.cursor.read_float()?);
    Ok(())
}

fn handle_dy(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    p.state.dy = Some(p.cursor.read_float()?);
    Ok(())
}

fn handle_dz(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.flags |= StateFlags::LOCAL_WORLD_ONLY;
    p.state.dz = Some(p.cursor.read_float()?);
    Ok(())
}

fn handle_x_rotation(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.pitch = FloatRange::parse(&mut p.cursor)?;
    Ok(())
}

fn handle_y_rotation(p: &mut SelectorParser) -> Result<(), ParseError> {
    p.state.yaw = FloatRange::parse(&mut p.cursor)?;
    Ok(())
}

fn handle_limit(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    let value = p.cursor.read_int()?;
    if value < 1 {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::LimitTooSmall, &p.cursor, start));
    }
    p.state.limit = value;
    p.state.flags |= StateFlags::HAS_LIMIT;
    Ok(())
}

fn handle_sort(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    p.bind_suggestor(Box::new(|builder| suggest_matching(Sorter::NAMES, builder)));
    let word = p.cursor.read_unquoted_string().to_string();
    // A sorter, once chosen, can't be replaced; an unknown word gets the
    // same error as a repeat.
    if p.state.flags.contains(StateFlags::HAS_SORTER) {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::IrreversibleSort(word), &p.cursor, start));
    }
    let Some(sorter) = Sorter::from_name(&word) else {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::IrreversibleSort(word), &p.cursor, start));
    };
    p.state.sorter = sorter;
    p.state.flags |= StateFlags::HAS_SORTER;
    Ok(())
}

fn handle_gamemode(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    let excludes = p.state.flags.contains(StateFlags::EXCLUDES_GAME_MODE);
    p.bind_suggestor(Box::new(move |builder| {
        let remaining = builder.remaining_lowercase().to_string();
        let stem = remaining.strip_prefix('!').unwrap_or(&remaining).to_string();
        for mode in GameMode::ALL {
            if mode.name().starts_with(&stem) {
                builder.suggest(format!("!{}", mode.name()));
                if !excludes {
                    builder.suggest(mode.name());
                }
            }
        }
    }));
    let negated = p.read_negation();
    if excludes && !negated {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(
            ParseErrorKind::InapplicableOption("gamemode".to_string()),
            &p.cursor,
            start,
        ));
    }
    let word = p.cursor.read_unquoted_string().to_string();
    let Some(mode) = GameMode::from_name(&word) else {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::InvalidGameMode(word), &p.cursor, start));
    };
    p.state.flags.remove(StateFlags::INCLUDES_NON_PLAYERS);
    p.state.flags |= if negated { StateFlags::EXCLUDES_GAME_MODE } else { StateFlags::SELECTS_GAME_MODE };
    p.state.and_predicate(move |entity| match entity.game_mode() {
        Some(current) => (current == mode) != negated,
        None => false,
    });
    Ok(())
}

fn handle_team(p: &mut SelectorParser) -> Result<(), ParseError> {
    let negated = p.read_negation();
    let team = p.cursor.read_unquoted_string().to_string();
    p.state.flags |= if negated { StateFlags::EXCLUDES_TEAM } else { StateFlags::SELECTS_TEAM };
    p.state.and_predicate(move |entity| {
        let current = entity.team_name().unwrap_or("");
        (current == team) != negated
    });
    Ok(())
}

fn handle_type(p: &mut SelectorParser) -> Result<(), ParseError> {
    let start = p.cursor.cursor();
    let excludes = p.state.flags.contains(StateFlags::EXCLUDES_TYPE);
    p.bind_suggestor(Box::new(move |builder| {
        if builder.remaining().is_empty() {
            builder.suggest("!");
            builder.suggest("!#");
            if !excludes {
                builder.suggest("#");
            }
        }
    }));
    let negated = p.read_negation();
    if excludes && !negated {
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(
            ParseErrorKind::InapplicableOption("type".to_string()),
            &p.cursor,
            start,
        ));
    }
    if negated {
        p.state.flags |= StateFlags::EXCLUDES_TYPE;
    }
    let grouped = p.read_tag_marker();
    let id_start = p.cursor.cursor();
    let Some(id) = read_resource_id(&mut p.cursor) else {
        let consumed = p.cursor.input()[id_start..p.cursor.cursor()].to_string();
        p.cursor.set_cursor(start);
        return Err(ParseError::at_pos(ParseErrorKind::InvalidEntityType(consumed), &p.cursor, start));
    };
    let id = id.to_string();
    if grouped {
        p.state.and_predicate(move |entity| entity.has_type_tag(&id) != negated);
    } else {
        if !negated {
            if id == "player" {
                p.state.flags.remove(StateFlags::INCLUDES_NON_PLAYERS);
            }
            p.state.entity_type = Some(id.clone());
            p.state.flags |= StateFlags::SELECTS_TYPE;
        }
        p.state.and_predicate(move |entity| (entity.type_id() == id) != negated);
    }
    Ok(())
}

fn handle_tag(p: &mut SelectorParser) -> Result<(), ParseError> {
    let negated = p.read_negation();
    let tag = p.cursor.read_unquoted_string().to_string();
    p.state.and_predicate(move |entity| {
        if tag.is_empty() {
            entity.tags().is_empty() != negated
        } else {
            entity.tags().iter().any(|t| t == &tag) != negated
        }
    });
    Ok(())
}

fn handle_scores(p: &mut SelectorParser) -> Result<(), ParseError> {
    let mut checks: HashMap<String, IntRange> = HashMap::new();
    p.cursor.expect('{')?;
    p.cursor.skip_whitespace();
    while p.cursor.can_read() && p.cursor.peek() != Some('}') {
        p.cursor.skip_whitespace();
        let objective = p.cursor.read_unquoted_string().to_string();
        p.cursor.skip_whitespace();
        p.cursor.expect('=')?;
        p.cursor.skip_whitespace();
        let range = IntRange::parse(&mut p.cursor)?;
        checks.insert(objective, range);
        p.cursor.skip_whitespace();
        if p.cursor.peek() == Some(',') {
            p.cursor.skip();
        }
    }
    p.cursor.expect('}')?;
    if !checks.is_empty() {
        p.state.and_predicate(move |entity| {
            checks.iter().all(|(objective, range)| {
                entity.score(objective).is_some_and(|value| range.test(value))
            })
        });
    }
    p.state.flags |= StateFlags::SELECTS_SCORES;
    Ok(())
}

/// What the `advancements` option asks of one advancement entry.
enum AdvancementCheck {
    Done(bool),
    Criteria(Vec<(String, bool)>),
}

fn read_advancement_id(p: &mut SelectorParser) -> Result<String, ParseError> {
    let start = p.cursor.cursor();
    match read_resource_id(&mut p.cursor) {
        Some(id) => Ok(id.to_string()),
        None => {
            let consumed = p.cursor.input()[start..p.cursor.cursor()].to_string();
            p.cursor.set_cursor(start);
            Err(ParseError::at_pos(ParseErrorKind::InvalidIdentifier(consumed), &p.cursor, start))
        }
    }
}

fn handle_advancements(p: &mut SelectorParser) -> Result<(), ParseError> {
    let mut checks: Vec<(String, AdvancementCheck)> = Vec::new();
    p.cursor.expect('{')?;
    p.cursor.skip_whitespace();
    while p.cursor.can_read() && p.cursor.peek() != Some('}') {
        p.cursor.skip_whitespace();
        let advancement = read_advancement_id(p)?;
        p.cursor.skip_whitespace();
        p.cursor.expect('=')?;
        p.cursor.skip_whitespace();
        if p.cursor.peek() == Some('{') {
            p.cursor.skip();
            p.cursor.skip_whitespace();
            let mut criteria: Vec<(String, bool)> = Vec::new();
            while p.cursor.can_read() && p.cursor.peek() != Some('}') {
                p.cursor.skip_whitespace();
                let criterion = p.cursor.read_unquoted_string().to_string();
                p.cursor.skip_whitespace();
                p.cursor.expect('=')?;
                p.cursor.skip_whitespace();
                let obtained = p.cursor.read_boolean()?;
                criteria.push((criterion, obtained));
                p.cursor.skip_whitespace();
                if p.cursor.peek() == Some(',') {
                    p.cursor.skip();
                }
            }
            p.cursor.expect('}')?;
            checks.push((advancement, AdvancementCheck::Criteria(criteria)));
        } else {
            let done = p.cursor.read_boolean()?;
            checks.push((advancement, AdvancementCheck::Done(done)));
        }
        p.cursor.skip_whitespace();
        if p.cursor.peek() == Some(',') {
            p.cursor.skip();
        }
    }
    p.cursor.expect('}')?;
    if !checks.is_empty() {
        p.state.and_predicate(move |entity| {
            checks.iter().all(|(advancement, check)| match check {
                AdvancementCheck::Done(want) => {
                    entity.advancement_done(advancement).unwrap_or(false) == *want
                }
                AdvancementCheck::Criteria(criteria) => criteria.iter().all(|(criterion, want)| {
                    entity.criterion_obtained(advancement, criterion).unwrap_or(false) == *want
                }),
            })
        });
        p.state.flags.remove(StateFlags::INCLUDES_NON_PLAYERS);
    }
    p.state.flags |= StateFlags::SELECTS_ADVANCEMENTS;
    Ok(())
}
