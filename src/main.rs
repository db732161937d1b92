use std::time::Instant;

use geodraw::{
    init_logging, DrawConfig, DrawInput, GeoPoint, HeadlessMap, ShapeStore, SphericalMercator,
    Toolbar, ToolbarAction, BUILD_DATE, VERSION,
};

/// Draws one polygon on a headless map and prints the collection as JSON.
fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("GeoDraw {} (built {})", VERSION, BUILD_DATE);

    let config = DrawConfig::load_or_default()?;
    let mut map = HeadlessMap::new(SphericalMercator, 14.0);
    let mut toolbar = Toolbar::new(config, Some(ShapeStore::new()), None)?;

    toolbar.activate(ToolbarAction::DrawPolygon, &mut map)?;
    for (lat, lng) in [(51.5007, -0.1246), (51.5014, -0.1419), (51.5081, -0.1281)] {
        let point = GeoPoint::new(lat, lng);
        toolbar.handle_input(DrawInput::PointerMove(point), &mut map, Instant::now())?;
        toolbar.handle_input(DrawInput::Click(point), &mut map, Instant::now())?;
    }
    if let Some(first) = map.handles_of(None).first().copied() {
        toolbar.handle_input(DrawInput::HandleClicked(first), &mut map, Instant::now())?;
    }

    println!("{}", toolbar.controller().store().to_json()?);
    Ok(())
}
