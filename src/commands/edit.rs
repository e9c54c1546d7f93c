//! Interactive editor command

use genie_matrix::{CustomEditor, EditorOptions};
use genie_transport::MonitorSink;
use razergenie::config::GenieConfig;
use tracing::info;

use super::{open_device, CommandResult};
use crate::cli::DeviceArgs;

/// Open the custom editor on the selected device
pub async fn edit(args: &DeviceArgs, config: &GenieConfig, discover: bool) -> CommandResult {
    // the terminal belongs to the editor, monitor lines go to the log
    let device = open_device(args, MonitorSink::Log).await?;

    let loader = config.layout_loader();
    info!("Layout sources: {}", loader.describe_sources().join(", "));

    let options = EditorOptions {
        matrix_discovery: discover,
        initial_color: config.initial_color,
    };
    let editor = CustomEditor::open(device, &loader, options).await?;
    razergenie::tui::run(editor).await
}
