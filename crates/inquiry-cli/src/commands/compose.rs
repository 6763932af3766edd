use super::current_session;
use anyhow::{Result, bail};
use inquiry_core::report::{Language, ReportFormat, ReportStyle, SectionKind, compose};
use inquiry_infrastructure::InquiryPaths;

/// Settings overriding the ones stored in the session.
pub struct Overrides {
    pub format: Option<ReportFormat>,
    pub style: Option<ReportStyle>,
    pub language: Option<Language>,
    pub exclude: Vec<SectionKind>,
}

pub async fn run(paths: &InquiryPaths, overrides: Overrides) -> Result<()> {
    let Some(session) = current_session(paths).await? else {
        bail!("No active research session to compose");
    };

    let mut settings = session.report_settings.clone().excluding(overrides.exclude);
    if let Some(format) = overrides.format {
        settings.format = format;
    }
    if let Some(style) = overrides.style {
        settings.style = style;
    }
    if let Some(language) = overrides.language {
        settings.language = language;
    }

    print!("{}", compose(&session, &settings));
    Ok(())
}
