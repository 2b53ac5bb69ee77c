use anyhow::Result;
use gymflow_core::virtualization::{DeviceClass, WindowParams, batch_profile, compute_window};

/// Prints the batch profile and the rows a list would materialize.
pub fn show(device: DeviceClass, params: WindowParams) -> Result<()> {
    let profile = batch_profile(device);
    println!("device class:            {device}");
    println!("max to render per batch: {}", profile.max_to_render_per_batch);
    println!(
        "batching period:         {}ms",
        profile.update_cells_batching_period.as_millis()
    );
    println!("initial to render:       {}", profile.initial_num_to_render);
    println!("window size:             {}", profile.window_size);

    let window = compute_window(params);
    if window.is_empty() {
        println!("window:                  empty");
        return Ok(());
    }
    println!(
        "window:                  rows {}..={} ({} rows)",
        window.start_index,
        window.end_index,
        window.len()
    );
    println!("total height:            {}", window.total_height);
    println!("offset:                  {}", window.offset_y);
    Ok(())
}
