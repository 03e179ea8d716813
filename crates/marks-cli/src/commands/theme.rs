//! Theme command handlers

use anyhow::{Context as _, Result};

use marks_core::Theme;

use crate::context::Context;
use crate::output::Output;

/// Show the active theme
pub fn show(context: &Context, output: &Output) -> Result<()> {
    output.print_theme(context.theme().theme());
    Ok(())
}

/// Flip between light and dark
pub fn toggle(context: &Context, output: &Output) -> Result<()> {
    let theme = context
        .theme()
        .toggle()
        .context("Failed to save theme")?;
    output.print_theme(theme);
    Ok(())
}

/// Set an explicit theme
pub fn set(context: &Context, value: String, output: &Output) -> Result<()> {
    let theme: Theme = value.trim().to_lowercase().parse()?;
    context
        .theme()
        .set(theme)
        .context("Failed to save theme")?;
    output.print_theme(theme);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marks_core::Config;
    use tempfile::TempDir;

    use crate::output::OutputFormat;

    fn context(temp_dir: &TempDir) -> Context {
        let config = Config {
            api_url: "http://localhost:3000/api".to_string(),
            data_dir: temp_dir.path().to_path_buf(),
            log_file: None,
        };
        Context::open(config).unwrap()
    }

    #[test]
    fn test_set_persists_across_contexts() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);

        set(&context(&temp_dir), "Dark".to_string(), &output).unwrap();
        assert_eq!(context(&temp_dir).theme().theme(), Theme::Dark);

        toggle(&context(&temp_dir), &output).unwrap();
        assert_eq!(context(&temp_dir).theme().theme(), Theme::Light);
    }

    #[test]
    fn test_set_rejects_unknown_theme() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);

        let err = set(&context(&temp_dir), "sepia".to_string(), &output).unwrap_err();
        assert!(err.to_string().contains("sepia"));
    }
}
