//! Offline layout selection

use genie_matrix::{select_layout, LayoutCell, LayoutRequest, Notices};
use genie_transport::{DeviceType, MatrixDimensions};

use super::CommandResult;
use razergenie::config::GenieConfig;

/// Run the layout selector for a described device and print the result
pub fn layout(
    config: &GenieConfig,
    device_type: &str,
    dimensions: MatrixDimensions,
    physical: &str,
    discover: bool,
) -> CommandResult {
    let loader = config.layout_loader();
    let request = LayoutRequest {
        device_type: DeviceType::from(device_type.to_lowercase().as_str()),
        dimensions,
        physical_layout: physical.to_string(),
        matrix_discovery: discover,
    };

    let mut notices = Notices::new();
    let selection = select_layout(&loader, &request, &mut notices);

    println!("Sources: {}", loader.describe_sources().join(", "));
    println!("Layout:  {}", selection.origin);
    println!(
        "Size:    {}x{} units",
        selection.layout.width(),
        selection.layout.height()
    );
    for notice in notices.drain() {
        println!("Notice:  {notice}");
    }
    println!();

    for row in selection.layout.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                LayoutCell::Key(key) => match (key.matrix, key.enabled) {
                    (Some(pos), true) => format!("{}[{}]", key.label, pos),
                    (Some(_), false) | (None, _) => format!("({})", key.label),
                },
                LayoutCell::Spacer => "_".to_string(),
            })
            .collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}
