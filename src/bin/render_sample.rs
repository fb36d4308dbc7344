//! Generate a small sample states CSV, run the full pipeline on it, and
//! print the resulting render payload as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use rusty_atlas::config::{PipelineConfig, REGION_NAME_KEY};
use rusty_atlas::data::loader::Source;
use rusty_atlas::pipeline::Pipeline;

const SAMPLE_CSV: &str = "sample_states.csv";

fn main() -> Result<()> {
    env_logger::init();

    write_sample_csv().context("writing sample CSV")?;

    let config = PipelineConfig {
        csv_source: Source::Path(PathBuf::from(SAMPLE_CSV)),
        geojson_path: PathBuf::from("data/india_states.geojson"),
        region_name_key: REGION_NAME_KEY.to_string(),
    };
    let mut pipeline = Pipeline::new(config);

    let metric = std::env::args().nth(1);
    let payload = pipeline
        .run(metric.as_deref())
        .context("running pipeline")?;

    println!("{}", serde_json::to_string_pretty(&payload)?);

    for notice in &payload.notices {
        eprintln!("notice: {notice}");
    }
    Ok(())
}

fn write_sample_csv() -> Result<()> {
    let mut file = std::fs::File::create(SAMPLE_CSV)?;
    writeln!(file, "state,latitude,longitude,claims_received,claims_settled")?;
    writeln!(file, "Madhya Pradesh,23.47,77.94,627513,294585")?;
    writeln!(file, "Odisha,20.94,84.80,632463,453461")?;
    writeln!(file, "Chhattisgarh,21.28,81.87,890118,527513")?;
    writeln!(file, "Maharashtra,19.75,75.71,374716,174196")?;
    writeln!(file, "Telangana,18.11,79.02,651822,230735")?;
    writeln!(file, "Jharkhand,23.61,85.28,110756,61970")?;
    println!("wrote {SAMPLE_CSV}");
    Ok(())
}
