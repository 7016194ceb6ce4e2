//! The static dialogue table.
//!
//! Each state is either interactive (a prompt plus options and/or a free-text
//! rule) or an action state that performs one side effect and continues to a
//! declared next state. The table is built once and never mutated.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::LazyLock;

use thiserror::Error;

use super::context::{format_amount, keys, Context};
use super::state::{Audience, ChatState};
use crate::models::meals::MealSlot;

/// Prompt text, fixed or derived from the context.
pub enum Prompt {
    Literal(&'static str),
    Computed(fn(&Context) -> String),
}

impl Prompt {
    pub fn render(&self, context: &Context) -> String {
        match self {
            Prompt::Literal(text) => (*text).to_string(),
            Prompt::Computed(build) => build(context),
        }
    }
}

/// A selectable choice. The patch is merged into the context when chosen.
pub struct ChatOption {
    pub text: &'static str,
    pub target: ChatState,
    pub patch: &'static [(&'static str, &'static str)],
}

impl ChatOption {
    pub const fn to(text: &'static str, target: ChatState) -> Self {
        Self {
            text,
            target,
            patch: &[],
        }
    }

    pub const fn with_patch(
        text: &'static str,
        target: ChatState,
        patch: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { text, target, patch }
    }
}

/// How free text is validated and where it is stored.
pub enum InputRule {
    /// Any non-blank text, stored trimmed under `key`.
    NonEmptyText { key: &'static str, invalid: ChatState },
    /// A finite decimal greater than zero, stored as a number under `key`.
    PositiveDecimal { key: &'static str, invalid: ChatState },
}

pub struct FreeText {
    pub target: ChatState,
    pub rule: InputRule,
}

impl FreeText {
    /// Validates `raw`, records it in the context and returns the next state.
    /// The raw text is always kept under `userInput` so invalid-input prompts
    /// can echo it.
    pub fn accept(&self, raw: &str, context: &mut Context) -> ChatState {
        let text = raw.trim();
        context.set(keys::USER_INPUT, text);

        match self.rule {
            InputRule::NonEmptyText { key, invalid } => {
                if text.is_empty() {
                    return invalid;
                }
                context.set(key, text);
                self.target
            }
            InputRule::PositiveDecimal { key, invalid } => match text.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => {
                    context.set(key, value);
                    self.target
                }
                _ => invalid,
            },
        }
    }

    fn targets(&self) -> [ChatState; 2] {
        let invalid = match self.rule {
            InputRule::NonEmptyText { invalid, .. } | InputRule::PositiveDecimal { invalid, .. } => invalid,
        };
        [self.target, invalid]
    }
}

/// Side effects an action state may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SaveMeal,
    SaveWater,
    LoadTodaySummary,
}

pub enum StateKind {
    Interactive {
        prompt: Prompt,
        options: Vec<ChatOption>,
        free_text: Option<FreeText>,
    },
    /// Runs `action`, then continues to `next`. Failures go to the
    /// audience's error state.
    Action { action: Action, next: ChatState },
}

pub struct StateDefinition {
    pub state: ChatState,
    pub audience: Audience,
    pub kind: StateKind,
    /// Tells the client to do something besides rendering, e.g. open a page.
    pub action_hint: Option<&'static str>,
}

impl StateDefinition {
    fn interactive(
        state: ChatState,
        audience: Audience,
        prompt: Prompt,
        options: Vec<ChatOption>,
    ) -> Self {
        Self {
            state,
            audience,
            kind: StateKind::Interactive {
                prompt,
                options,
                free_text: None,
            },
            action_hint: None,
        }
    }

    fn free_text(
        state: ChatState,
        prompt: Prompt,
        free_text: FreeText,
        options: Vec<ChatOption>,
    ) -> Self {
        Self {
            state,
            audience: Audience::Member,
            kind: StateKind::Interactive {
                prompt,
                options,
                free_text: Some(free_text),
            },
            action_hint: None,
        }
    }

    fn action(state: ChatState, action: Action, next: ChatState) -> Self {
        Self {
            state,
            audience: Audience::Member,
            kind: StateKind::Action { action, next },
            action_hint: None,
        }
    }

    fn with_hint(mut self, hint: &'static str) -> Self {
        self.action_hint = Some(hint);
        self
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, StateKind::Action { .. })
    }

    /// Every state this one can lead to, not counting the audience fallback.
    pub fn targets(&self) -> Vec<ChatState> {
        match &self.kind {
            StateKind::Interactive { options, free_text, .. } => {
                let mut targets: Vec<ChatState> = options.iter().map(|o| o.target).collect();
                if let Some(free_text) = free_text {
                    targets.extend(free_text.targets());
                }
                targets
            }
            StateKind::Action { next, .. } => vec![*next],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("state {0} is defined more than once")]
    Duplicate(ChatState),
    #[error("{audience} dialogue has no {state} state")]
    MissingRoot { audience: Audience, state: ChatState },
    #[error("{from} leads to undefined state {to}")]
    MissingTarget { from: ChatState, to: ChatState },
    #[error("{from} ({from_audience}) leads to {to} of another dialogue")]
    CrossAudience {
        from: ChatState,
        from_audience: Audience,
        to: ChatState,
    },
    #[error("the root or fallback state {0} must be interactive")]
    NonInteractiveRoot(ChatState),
    #[error("action states starting at {0} never reach an interactive state")]
    ActionCycle(ChatState),
}

pub struct StateTable {
    states: HashMap<ChatState, StateDefinition>,
    duplicates: Vec<ChatState>,
}

impl StateTable {
    pub fn new(definitions: Vec<StateDefinition>) -> Self {
        let mut states = HashMap::with_capacity(definitions.len());
        let mut duplicates = Vec::new();
        for definition in definitions {
            let state = definition.state;
            if states.insert(state, definition).is_some() {
                duplicates.push(state);
            }
        }
        Self { states, duplicates }
    }

    pub fn get(&self, state: ChatState) -> Option<&StateDefinition> {
        self.states.get(&state)
    }

    /// Looks up a state by its wire name.
    pub fn find(&self, name: &str) -> Option<&StateDefinition> {
        ChatState::from_str(name).ok().and_then(|state| self.get(state))
    }

    /// Checks graph closure: roots and fallbacks exist and are interactive,
    /// every target exists within the same dialogue, and no chain of action
    /// states loops without reaching an interactive state.
    pub fn validate(&self) -> Result<(), TableError> {
        if let Some(state) = self.duplicates.first() {
            return Err(TableError::Duplicate(*state));
        }

        for audience in [Audience::Member, Audience::Guest] {
            for state in [audience.entry_state(), audience.error_state()] {
                let definition = self
                    .get(state)
                    .ok_or(TableError::MissingRoot { audience, state })?;
                if definition.is_action() {
                    return Err(TableError::NonInteractiveRoot(state));
                }
            }
        }

        for definition in self.states.values() {
            for target in definition.targets() {
                let target_definition = self.get(target).ok_or(TableError::MissingTarget {
                    from: definition.state,
                    to: target,
                })?;
                if target_definition.audience != definition.audience {
                    return Err(TableError::CrossAudience {
                        from: definition.state,
                        from_audience: definition.audience,
                        to: target,
                    });
                }
            }
        }

        for definition in self.states.values().filter(|d| d.is_action()) {
            let mut seen = HashSet::new();
            let mut current = definition;
            while let StateKind::Action { next, .. } = &current.kind {
                if !seen.insert(current.state) {
                    return Err(TableError::ActionCycle(definition.state));
                }
                // Targets were checked above
                match self.get(*next) {
                    Some(next_definition) => current = next_definition,
                    None => break,
                }
            }
        }

        Ok(())
    }
}

/// The dialogue shared by every request.
pub static STATE_TABLE: LazyLock<StateTable> = LazyLock::new(|| StateTable::new(definitions()));

const BACK_TO_MENU: &str = "Back to Main Menu";

fn meal_label(context: &Context) -> &'static str {
    context
        .get_str(keys::MEAL_TYPE)
        .and_then(|slot| MealSlot::from_str(slot).ok())
        .map(|slot| slot.label())
        .unwrap_or("your meal")
}

fn main_menu_prompt(context: &Context) -> String {
    format!(
        "Hi {}! I'm your FitTrack assistant. How can I help you today?",
        context.display_name()
    )
}

fn meal_details_prompt(context: &Context) -> String {
    format!(
        "Okay, {}. What did you eat? Describe it briefly, like \"2 eggs and toast\".",
        meal_label(context)
    )
}

fn meal_confirm_prompt(context: &Context) -> String {
    let description = context.get_str(keys::FOOD_DESCRIPTION).unwrap_or("your food");
    let calories = context.get_f64(keys::CALORIES).unwrap_or(0.0);
    let mut message = format!(
        "Got it: \"{}\" for {}, about {:.0} kcal. I've added it to today's meal plan.",
        description,
        meal_label(context),
        calories
    );
    if let Some(warning) = context.get_str(keys::WARNING) {
        message.push(' ');
        message.push_str(warning);
    }
    message.push_str(" Anything else?");
    message
}

fn water_confirm_prompt(context: &Context) -> String {
    let liters = context.get_f64(keys::LITERS).unwrap_or(0.0);
    format!(
        "Logged {} liters of water for today. Stay hydrated!",
        format_amount(liters)
    )
}

fn water_invalid_prompt(context: &Context) -> String {
    format!(
        "\"{}\" isn't a valid amount. Please enter a positive number of liters, like 1.5.",
        context.get_str(keys::USER_INPUT).unwrap_or_default()
    )
}

fn today_summary_prompt(context: &Context) -> String {
    let consumed = context.get_f64(keys::CALORIES_CONSUMED).unwrap_or(0.0);
    let burned = context.get_f64(keys::CALORIES_BURNED).unwrap_or(0.0);
    let water = context.get_f64(keys::WATER_LITERS).unwrap_or(0.0);
    format!(
        "Today so far: {:.0} kcal eaten, {:.0} kcal burned and {} liters of water. Open the dashboard for the full picture.",
        consumed,
        burned,
        format_amount(water)
    )
}

fn member_error_prompt(context: &Context) -> String {
    match context.get_str(keys::ERROR_MESSAGE) {
        Some(message) => message.to_string(),
        None => "Sorry, I didn't understand that. Please choose an option.".to_string(),
    }
}

fn definitions() -> Vec<StateDefinition> {
    use Audience::{Guest, Member};
    use ChatState::*;

    vec![
        // Member dialogue
        StateDefinition::interactive(
            MainMenu,
            Member,
            Prompt::Computed(main_menu_prompt),
            vec![
                ChatOption::to("Log Meal", LogMealStart),
                ChatOption::to("Log Water", LogWaterStart),
                ChatOption::to("View Today's Summary", ViewToday),
            ],
        ),
        StateDefinition::interactive(
            LogMealStart,
            Member,
            Prompt::Literal("Great! Which meal would you like to log?"),
            vec![
                ChatOption::with_patch("Breakfast", LogMealDetails, &[(keys::MEAL_TYPE, "breakfast")]),
                ChatOption::with_patch("Lunch", LogMealDetails, &[(keys::MEAL_TYPE, "lunch")]),
                ChatOption::with_patch("Dinner", LogMealDetails, &[(keys::MEAL_TYPE, "dinner")]),
                ChatOption::with_patch("Snack", LogMealDetails, &[(keys::MEAL_TYPE, "snack")]),
                ChatOption::to("Back", MainMenu),
            ],
        ),
        StateDefinition::free_text(
            LogMealDetails,
            Prompt::Computed(meal_details_prompt),
            FreeText {
                target: SaveMeal,
                rule: InputRule::NonEmptyText {
                    key: keys::FOOD_DESCRIPTION,
                    invalid: Error,
                },
            },
            vec![ChatOption::to("Cancel", MainMenu)],
        ),
        StateDefinition::action(SaveMeal, Action::SaveMeal, LogMealConfirm),
        StateDefinition::interactive(
            LogMealConfirm,
            Member,
            Prompt::Computed(meal_confirm_prompt),
            vec![
                ChatOption::to("Log Another Meal", LogMealStart),
                ChatOption::to(BACK_TO_MENU, MainMenu),
            ],
        ),
        StateDefinition::free_text(
            LogWaterStart,
            Prompt::Literal("Sure, how many liters of water have you had today?"),
            FreeText {
                target: SaveWater,
                rule: InputRule::PositiveDecimal {
                    key: keys::LITERS,
                    invalid: LogWaterInvalid,
                },
            },
            vec![ChatOption::to("Cancel", MainMenu)],
        ),
        StateDefinition::action(SaveWater, Action::SaveWater, LogWaterConfirm),
        StateDefinition::interactive(
            LogWaterConfirm,
            Member,
            Prompt::Computed(water_confirm_prompt),
            vec![ChatOption::to(BACK_TO_MENU, MainMenu)],
        ),
        StateDefinition::interactive(
            LogWaterInvalid,
            Member,
            Prompt::Computed(water_invalid_prompt),
            vec![
                ChatOption::to("Try Again", LogWaterStart),
                ChatOption::to("Cancel", MainMenu),
            ],
        ),
        StateDefinition::action(ViewToday, Action::LoadTodaySummary, TodaySummary),
        StateDefinition::interactive(
            TodaySummary,
            Member,
            Prompt::Computed(today_summary_prompt),
            vec![ChatOption::to(BACK_TO_MENU, MainMenu)],
        )
        .with_hint("open_dashboard"),
        StateDefinition::interactive(
            Error,
            Member,
            Prompt::Computed(member_error_prompt),
            vec![ChatOption::to("Start Over", MainMenu)],
        ),
        // Guest dialogue
        StateDefinition::interactive(
            GuestWelcome,
            Guest,
            Prompt::Literal(
                "Hi Guest! I'm the FitTrack assistant. Sign up or log in to track your meals, water and workouts.",
            ),
            vec![
                ChatOption::to("What can FitTrack do?", GuestFeatures),
                ChatOption::to("How do I get started?", GuestGettingStarted),
            ],
        ),
        StateDefinition::interactive(
            GuestFeatures,
            Guest,
            Prompt::Literal(
                "FitTrack looks up the calories of the meals you describe, tracks your daily water intake, \
                 estimates calories burned by your workouts and shows your remaining calorie budget on a dashboard.",
            ),
            vec![
                ChatOption::to("How do I get started?", GuestGettingStarted),
                ChatOption::to("Back", GuestWelcome),
            ],
        ),
        StateDefinition::interactive(
            GuestGettingStarted,
            Guest,
            Prompt::Literal(
                "Create a free account, fill in your fitness status so I can work out your calorie goal, \
                 then start logging. I'll open the sign-up page for you.",
            ),
            vec![ChatOption::to("OK", GuestWelcome)],
        )
        .with_hint("open_register"),
        StateDefinition::interactive(
            GuestError,
            Guest,
            Prompt::Literal("Sorry, I didn't understand that. Please choose an option."),
            vec![ChatOption::to("Start Over", GuestWelcome)],
        ),
    ]
}
