use inquire::{InquireError, Select, Text};

use crate::door_form::room_choices;
use crate::store::Store;

/// Pick a room for a door. The outer `None` means the prompt was cancelled;
/// `Some(None)` means "no room".
pub fn pick_room(store: &impl Store, current: Option<i64>) -> anyhow::Result<Option<Option<i64>>> {
    let choices = room_choices(store)?;
    let cursor = choices
        .iter()
        .position(|c| c.room_id == current)
        .unwrap_or(0);

    let selection = Select::new("Room:", choices)
        .with_starting_cursor(cursor)
        .with_page_size(15)
        .with_help_message("Type to filter, Enter to select, Esc to keep current")
        .with_vim_mode(true)
        .prompt();

    match selection {
        Ok(choice) => Ok(Some(choice.room_id)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Prompt for a text value prefilled with the current one. `None` when
/// cancelled.
pub fn prompt_text(message: &str, current: &str) -> anyhow::Result<Option<String>> {
    match Text::new(message).with_initial_value(current).prompt() {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Prompt for a door name, rejecting blank input.
pub fn prompt_door_name(current: &str) -> anyhow::Result<Option<String>> {
    let result = Text::new("Door name:")
        .with_initial_value(current)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(inquire::validator::Validation::Invalid(
                    "Name cannot be empty".into(),
                ))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt();

    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
