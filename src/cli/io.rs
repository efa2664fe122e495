use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::core::CommandError;
use crate::cli::forms::FieldDescriptor;

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(prompt: &str) -> Result<bool, CommandError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for one form field, re-asking until the field validator accepts it.
pub fn prompt_field(field: &FieldDescriptor) -> Result<String, CommandError> {
    tracing::debug!(field = field.key, "prompting for form field");
    if let Some(help) = field.help {
        crate::cli::output::info(help);
    }
    let theme = ColorfulTheme::default();
    let validator = field.validator;
    Input::<String>::with_theme(&theme)
        .with_prompt(field.label)
        .validate_with(move |value: &String| -> Result<(), String> {
            validator
                .validate(value)
                .map(|_| ())
                .map_err(|err| err.message)
        })
        .interact_text()
        .map_err(CommandError::from)
}

/// Arrow-key picker over `options`. Returns `None` when the user escapes.
pub fn choose(prompt: &str, options: &[String]) -> Result<Option<usize>, CommandError> {
    if options.is_empty() {
        return Ok(None);
    }
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact_opt()
        .map_err(CommandError::from)
}
