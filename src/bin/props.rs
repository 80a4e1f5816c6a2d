//! Print a document's properties the way the viewer's dialog shows them.
//!
//! Usage: `lesverk-props <file.pdf> [locale]`
//!
//! The optional locale tag ("en-US", "is", ...) selects both the message
//! language and the unit system for the page size.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesverk_core::{
    ui, DocumentProperties, DocumentProxy, EventBus, Field, L10n, LopdfDocument, OverlayManager,
    Result,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesverk_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: lesverk-props <file.pdf> [locale]");
        return ExitCode::FAILURE;
    };
    let locale = args.next().unwrap_or_else(|| "en-US".to_string());

    match run(path, &locale).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("lesverk-props: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: PathBuf, locale: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document: Arc<dyn DocumentProxy> = Arc::new(LopdfDocument::open(&path)?);

    let l10n = L10n::new(locale);
    let overlays = Arc::new(OverlayManager::new());
    let events = EventBus::new();
    let (views, slots) = ui::text_field_views();
    let controller = DocumentProperties::new(
        Arc::clone(&overlays),
        &events,
        views,
        l10n.clone(),
        Box::new(move || file_name.clone()),
    );

    controller.set_document(Some(document));
    controller.open().await?;
    println!("{}", ui::dialog_title(&l10n));
    for field in Field::ALL {
        println!("  {}: {}", field.label(&l10n), slots[&field].text());
    }
    controller.close()?;

    if let Some(data) = controller.field_data() {
        if let Ok(json) = serde_json::to_string_pretty(&data) {
            println!();
            println!("{json}");
        }
    }
    Ok(())
}
