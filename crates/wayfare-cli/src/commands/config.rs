use crate::OutputFormat;
use anyhow::Result;
use wayfare_core::Settings;

const MASK: &str = "****";

/// Settings safe to print: the password is masked wherever it appears
pub fn redacted(settings: &Settings) -> Settings {
    let mut shown = settings.clone();
    if !shown.database.password.is_empty() {
        shown.database.password = MASK.to_string();
    }
    if shown.database.url.is_some() {
        shown.database.url = Some(settings.database.redacted_url());
    }
    shown
}

pub fn execute(settings: &Settings, format: OutputFormat) -> Result<()> {
    let shown = redacted(settings);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Pretty => output_pretty(&shown),
    }

    Ok(())
}

fn output_pretty(settings: &Settings) {
    use console::style;

    println!("\n{}", style("Database").bold());
    println!("  URL:       {}", settings.database.redacted_url());

    println!("\n{}", style("Driver").bold());
    println!("  Backend:   {}", settings.driver.backend.as_str());
    println!("  Endpoint:  {}", settings.driver.url);
    println!("  Headless:  {}", settings.driver.headless);

    let workflow = &settings.workflow;
    println!("\n{}", style("Workflow").bold());
    println!("  Site:      {}", workflow.site_url);
    println!("  Lookup:    {:?} per element", workflow.lookup_timeout);
    println!(
        "  Retry:     {} attempts, {:?} apart",
        workflow.retry.times(),
        workflow.retry.delay()
    );
    println!("  On skip:   {:?}", workflow.step_policy);
}
