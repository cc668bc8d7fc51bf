//! Dataset validation command implementation.

use super::CliError;
use geoquest::geo::{GeoProjector, HitTester};
use geoquest::sim::{SIM_HEIGHT, SIM_WIDTH};
use geoquest::Dataset;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or fails validation.
pub(crate) fn execute(dataset: &Path) -> Result<(), CliError> {
    println!("Validating: {}", dataset.display());
    println!();

    let data = match Dataset::load(dataset) {
        Ok(data) => {
            print_check("Parse and structure", true);
            data
        }
        Err(e) => {
            print_check("Parse and structure", false);
            return Err(e.into());
        }
    };

    let projector =
        GeoProjector::albers_usa().fit(data.boundary_points(), SIM_WIDTH, SIM_HEIGHT);
    let placement = projector.check_dataset(&data);
    print_check("Inside map projection", placement.is_ok());

    // Every city should land inside its own region once projected
    let hits = HitTester::build(&data, &projector);
    let mut misplaced = Vec::new();
    let mut unprojectable = Vec::new();
    for region in data.regions() {
        for (city, coord) in &region.cities {
            match projector.project(*coord) {
                Some(p) if hits.region_at(p) == Some(region.id.as_str()) => {}
                Some(_) => misplaced.push(format!("{city} ({})", region.id)),
                None => unprojectable.push(format!("{city} ({})", region.id)),
            }
        }
    }
    print_check("Cities project", unprojectable.is_empty());
    print_check("Cities inside their region", misplaced.is_empty());

    let missing_facts: usize = data
        .regions()
        .iter()
        .map(|r| r.city_names().filter(|c| r.fact(c).is_none()).count())
        .sum();

    println!();
    println!("Summary:");
    println!("  Regions:       {}", data.len());
    println!("  Territories:   {}", data.territories().len());
    println!(
        "  Cities:        {}",
        data.regions().iter().map(|r| r.cities.len()).sum::<usize>()
    );
    println!("  Missing facts: {missing_facts}");
    for name in &unprojectable {
        println!("  Outside projection: {name}");
    }
    for name in &misplaced {
        println!("  Outside its region: {name}");
    }

    placement?;
    if !unprojectable.is_empty() || !misplaced.is_empty() {
        return Err(CliError::new("Some cities cannot be clicked on the map"));
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
