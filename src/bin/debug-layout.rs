/// Diagnostic tool to verify items → capacity → packing → geometry
use rowmap_rs::data::{self, Dataset};
use rowmap_rs::layout::capacity::{self, WeightScale};
use rowmap_rs::layout::{packer, LayoutConfig};
use rowmap_rs::render::text::format_percent;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rowmap_rs=debug".parse().unwrap()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let data_path = args.next().filter(|a| a != "-").map(PathBuf::from);
    let rows: usize = match args.next() {
        Some(r) => r.parse()?,
        None => 3,
    };

    println!("=== DIAGNOSTIC: Items → Layout Pipeline ===");

    let items = match &data_path {
        Some(path) => {
            println!("Data: {}", path.display());
            Dataset::new(data::load_items(path)?).valid_items()
        }
        None => {
            println!("Data: built-in sample");
            Dataset::sample().valid_items()
        }
    };
    println!("Rows: {}", rows);

    println!("\n[1] {} valid items (input order):", items.len());
    for (i, item) in items.iter().enumerate() {
        println!(
            "    [{}] '{}' weight={} value={}",
            i,
            item.name,
            item.weight,
            format_percent(item.value)
        );
    }
    if items.is_empty() {
        println!("\nNothing to lay out.");
        return Ok(());
    }

    // Packing order shared by solver and packer
    let order = packer::descending_order(&items);
    let weights: Vec<f64> = order.iter().map(|&i| items[i].weight).collect();
    println!("\n[2] Packing order: {:?}", order);

    let config = LayoutConfig::default();
    let start = std::time::Instant::now();
    let cap = capacity::solve(&weights, rows, &config)?;
    println!(
        "\n[3] Capacity {} (units={}, scale x{}) solved in {:.3}ms",
        cap.value(),
        cap.units,
        cap.scale.factor(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let max_weight = weights.iter().copied().fold(0.0, f64::max);
    let total: f64 = weights.iter().sum();
    println!("    max weight: {}  total: {}", max_weight, total);

    let packed = packer::pack(&items, cap, rows)?;
    println!("\n[4] Rows:");
    for (r, row) in packed.rows.iter().enumerate() {
        let names: Vec<&str> = row.items.iter().map(|&i| items[i].name.as_str()).collect();
        println!(
            "    row {}: load {}/{} {:?}",
            r,
            cap.scale.to_weight(row.load),
            cap.value(),
            names
        );
    }

    println!("\n[5] Checking for anomalies:");
    let mut problems = 0;

    if packed.rows.len() != rows {
        println!("    ✗ expected {} rows, got {}", rows, packed.rows.len());
        problems += 1;
    }
    for (r, row) in packed.rows.iter().enumerate() {
        if row.load > cap.units {
            println!("    ✗ row {} overflows ({} > {})", r, row.load, cap.units);
            problems += 1;
        }
    }

    let mut seen = vec![0usize; items.len()];
    for (_, item) in packed.row_major() {
        seen[item] += 1;
    }
    for (i, count) in seen.iter().enumerate() {
        if *count != 1 {
            println!("    ✗ item {} placed {} times", i, count);
            problems += 1;
        }
    }

    // One unit less must fail, unless we are already at the largest weight.
    let units = capacity::scale_weights(&weights, cap.scale)?;
    let floor = units.iter().copied().max().unwrap_or(0);
    if cap.units > floor && capacity::fits(&units, rows, cap.units - 1) {
        println!("    ✗ capacity {} is not minimal", cap.value());
        problems += 1;
    }
    if cap.scale != WeightScale::UNIT {
        println!("    ! fractional weights rescaled by x{}", cap.scale.factor());
    }

    if problems == 0 {
        println!("    ✓ no anomalies");
    }

    let layout = rowmap_rs::layout::geometry::map(&items, &packed);
    println!("\n[6] Geometry (fractions of chart):");
    for rect in &layout.rects {
        println!(
            "    '{}' row {} x={:.3} w={:.3} y={:.3} h={:.3}",
            items[rect.item].name,
            rect.row,
            rect.x,
            rect.w,
            rect.y,
            rect.h
        );
    }

    Ok(())
}
