use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::{keys, Context};
use super::state::{Audience, ChatState};
use super::store::DailyRecordStore;
use super::table::{StateKind, StateTable, STATE_TABLE};
use crate::services::nutrition::NutritionLookup;

/// Upper bound on action states traversed in one turn.
pub const DEFAULT_MAX_ACTION_HOPS: usize = 8;

const FALLBACK_MESSAGE: &str = "Sorry, something went wrong. Let's start over.";
const ACCOUNT_UNAVAILABLE_MESSAGE: &str =
    "Sorry, I couldn't load your account right now. Please try again in a moment.";

/// Server-trusted identity of the person chatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub user_id: Uuid,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// State the client is answering; `None` starts a conversation.
    #[serde(default)]
    pub current_state: Option<String>,
    #[serde(default)]
    pub selected_option: Option<String>,
    #[serde(default)]
    pub user_input: Option<String>,
    /// Context echoed from the previous response.
    #[serde(default)]
    pub context: Option<Context>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub new_state: String,
    pub message: String,
    pub options: Vec<OptionView>,
    pub expects_user_input: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_required: Option<String>,
    pub context: Context,
}

/// Drives one dialogue turn: resolve the input against the state the client
/// answered, run any action states, then render the interactive state reached.
pub struct DialogueEngine {
    pub(super) nutrition: Arc<dyn NutritionLookup>,
    pub(super) records: Arc<dyn DailyRecordStore>,
    table: &'static StateTable,
    clock: fn() -> NaiveDate,
    max_action_hops: usize,
}

impl DialogueEngine {
    pub fn new(nutrition: Arc<dyn NutritionLookup>, records: Arc<dyn DailyRecordStore>) -> Self {
        Self {
            nutrition,
            records,
            table: &STATE_TABLE,
            clock: crate::utils::today,
            max_action_hops: DEFAULT_MAX_ACTION_HOPS,
        }
    }

    /// Replaces the dialogue table.
    pub fn with_table(mut self, table: &'static StateTable) -> Self {
        self.table = table;
        self
    }

    /// Sets the source of "today" for daily records.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_action_hops(mut self, hops: usize) -> Self {
        self.max_action_hops = hops;
        self
    }

    pub(super) fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Advances the conversation by one turn. Never fails: anything the
    /// dialogue cannot handle lands on the audience's error state.
    pub async fn advance(&self, request: TransitionRequest, identity: Option<&ChatIdentity>) -> TransitionResponse {
        let audience = if identity.is_some() {
            Audience::Member
        } else {
            Audience::Guest
        };
        let mut context = Context::from_carried(request.context.unwrap_or_default(), identity);

        let current = request
            .current_state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let selected = request
            .selected_option
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let input = request.user_input.as_deref();

        let state = match current {
            Some(name) if selected.is_some() || input.is_some() => {
                self.resolve(name, selected, input, audience, &mut context)
            }
            _ => audience.entry_state(),
        };

        let state = self.run_actions(state, audience, identity, &mut context).await;
        self.render(state, audience, context)
    }

    /// Answers a signed-in member whose account could not be loaded this
    /// turn: the member error state, without touching any records.
    pub fn account_unavailable(&self, request: TransitionRequest) -> TransitionResponse {
        let mut context = Context::from_carried(request.context.unwrap_or_default(), None);
        context.remove(keys::DISPLAY_NAME);
        context.set(keys::ERROR_MESSAGE, ACCOUNT_UNAVAILABLE_MESSAGE);
        self.render(Audience::Member.error_state(), Audience::Member, context)
    }

    /// Applies the user's answer to the state it was given for.
    fn resolve(
        &self,
        name: &str,
        selected: Option<&str>,
        input: Option<&str>,
        audience: Audience,
        context: &mut Context,
    ) -> ChatState {
        let Some(definition) = self.table.find(name).filter(|d| d.audience == audience) else {
            tracing::debug!(state = name, %audience, "[Chatbot] Unknown or foreign state");
            return audience.error_state();
        };

        let StateKind::Interactive { options, free_text, .. } = &definition.kind else {
            tracing::debug!(state = name, "[Chatbot] Input sent to an action state");
            return audience.error_state();
        };

        if let Some(text) = selected {
            return match options.iter().find(|option| option.text.eq_ignore_ascii_case(text)) {
                Some(option) => {
                    for (key, value) in option.patch {
                        context.set(key, *value);
                    }
                    option.target
                }
                None => {
                    tracing::debug!(state = name, option = text, "[Chatbot] Unmatched option");
                    audience.error_state()
                }
            };
        }

        match (input, free_text) {
            (Some(raw), Some(free_text)) => free_text.accept(raw, context),
            _ => audience.error_state(),
        }
    }

    /// Follows action states until an interactive one is reached.
    async fn run_actions(
        &self,
        mut state: ChatState,
        audience: Audience,
        identity: Option<&ChatIdentity>,
        context: &mut Context,
    ) -> ChatState {
        let mut hops = 0;
        loop {
            let Some(definition) = self.table.get(state) else {
                return audience.error_state();
            };
            let StateKind::Action { action, next } = &definition.kind else {
                return state;
            };

            if hops >= self.max_action_hops {
                tracing::warn!(
                    state = %state,
                    hops,
                    "[Chatbot] Action chain exceeded the hop limit"
                );
                return audience.error_state();
            }
            hops += 1;

            state = match identity {
                Some(identity) if definition.audience == Audience::Member => {
                    match self.run_action(*action, identity, context).await {
                        Ok(()) => *next,
                        Err(message) => {
                            context.set(keys::ERROR_MESSAGE, message);
                            audience.error_state()
                        }
                    }
                }
                _ => audience.error_state(),
            };
        }
    }

    fn render(&self, state: ChatState, audience: Audience, context: Context) -> TransitionResponse {
        match self.table.get(state).map(|d| (d, &d.kind)) {
            Some((definition, StateKind::Interactive { prompt, options, free_text })) => TransitionResponse {
                new_state: state.to_string(),
                message: prompt.render(&context),
                options: options
                    .iter()
                    .map(|option| OptionView {
                        text: option.text.to_string(),
                    })
                    .collect(),
                expects_user_input: free_text.is_some(),
                action_required: definition.action_hint.map(str::to_string),
                context,
            },
            _ => {
                tracing::error!(state = %state, "[Chatbot] No interactive definition to render");
                TransitionResponse {
                    new_state: audience.error_state().to_string(),
                    message: FALLBACK_MESSAGE.to_string(),
                    options: vec![OptionView {
                        text: "Start Over".to_string(),
                    }],
                    expects_user_input: false,
                    action_required: None,
                    context,
                }
            }
        }
    }
}
