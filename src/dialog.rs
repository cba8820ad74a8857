use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::Result;

/// Ask the user for a yes/no answer. Defaults to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(answer)
}
