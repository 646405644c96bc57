//! CLI smoke driver.
//!
//! # Responsibility
//! - Verify `wardrobe_core` linkage without a UI host.
//! - Play the presentation layer for one camera capture and one library
//!   import, then print the resulting catalog.

use log::info;
use wardrobe_core::{
    AcquisitionConfig, AcquisitionMethod, AcquisitionResult, AcquisitionWorkflow, AssetRef,
    AssetResolutionError, Catalog, CatalogChange, CatalogObserver, ImageHandle, SessionOutcome,
};

struct PrintObserver;

impl CatalogObserver for PrintObserver {
    fn on_catalog_changed(&mut self, revision: u64, change: &CatalogChange) {
        println!("catalog revision={revision} change={change:?}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("wardrobe_core version={}", wardrobe_core::core_version());

    if let Ok(dir) = std::env::var("WARDROBE_LOG_DIR") {
        if let Err(err) = wardrobe_core::init_logging(wardrobe_core::default_log_level(), &dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut catalog = Catalog::new();
    catalog.subscribe(Box::new(PrintObserver));
    let mut workflow = match AcquisitionWorkflow::with_catalog(AcquisitionConfig::default(), catalog)
    {
        Ok(workflow) => workflow,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run_demo(&mut workflow).await {
        eprintln!("demo rejected an intent: {err}");
        std::process::exit(1);
    }

    for entry in workflow.catalog().list() {
        println!(
            "entry id={} label={} source={} bytes={}",
            entry.id(),
            entry.label(),
            entry.asset().source.as_str(),
            entry.asset().image.byte_len()
        );
    }
}

async fn run_demo(workflow: &mut AcquisitionWorkflow) -> AcquisitionResult<()> {
    workflow.start_acquisition()?;
    workflow.choose_method(AcquisitionMethod::Camera)?;
    workflow.launch_picker()?;
    let capture = AssetRef::live_capture(ImageHandle::from_bytes(vec![0u8; 64]));
    report(workflow.deliver_capture(Some(capture))?);

    workflow.start_acquisition()?;
    workflow.choose_method(AcquisitionMethod::Library)?;
    let request = workflow.launch_picker()?;
    info!("event=demo_picker module=cli status=ok cap={:?}", request.selection_cap);

    let (picker, feed) = workflow.open_feed();
    for index in 0..4u8 {
        let sender = picker.clone();
        tokio::spawn(async move {
            let result = if index == 2 {
                Err(AssetResolutionError::Decode("demo failure".to_string()))
            } else {
                Ok(AssetRef::library_import(ImageHandle::from_bytes(vec![
                    index;
                    32
                ])))
            };
            sender.deliver(result).await
        });
    }
    picker.dismiss_expecting(4).await;
    report(workflow.collect_from(feed).await?);

    if let Some(first) = workflow.catalog().list().first().map(|entry| entry.id()) {
        workflow.relabel_requested(first, "Rain jacket");
    }
    Ok(())
}

fn report(outcome: SessionOutcome) {
    match outcome {
        SessionOutcome::Committed { ids, dropped } => {
            println!("session committed added={} dropped={dropped}", ids.len());
        }
        SessionOutcome::Cancelled { dropped } => {
            println!("session cancelled dropped={dropped}");
        }
    }
}
