//! Find a PI server, search a tag, fetch every calculation type and print
//! a value count summary.
//!
//! ```text
//! PIWEBAPI_URL=https://host/piwebapi PIWEBAPI_USER=me PIWEBAPI_PASSWORD=... \
//!     cargo run --example sinusoid -- PISRV01 name:sinusoid
//! ```

use piwebapi_client::prelude::*;
use piwebapi_client::Slot;
use std::env;

const CALCULATION_TYPES: [CalculationType; 5] = [
    CalculationType::Current,
    CalculationType::Interpolated,
    CalculationType::Recorded,
    CalculationType::Plot,
    CalculationType::Summary,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let url = env::var("PIWEBAPI_URL")?;
    let mut config = ClientConfig::new(url);
    if let (Ok(user), Ok(password)) = (env::var("PIWEBAPI_USER"), env::var("PIWEBAPI_PASSWORD")) {
        config = config.basic_auth(user, password);
    }

    let mut args = env::args().skip(1);
    let server_name = args.next().unwrap_or_else(|| "PISRV01".to_string());
    let query = args.next().unwrap_or_else(|| "name:sinusoid".to_string());

    let client = PiWebApiClient::connect(&config, Logger::global()).await?;

    let server = client
        .data_servers()
        .get_by_name(&server_name)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no PI Data Archive named {}", server_name))?;

    let mut points = client
        .points()
        .search(&query, 100, &format!("pi:{}", server.name))
        .await?;

    for calculation_type in CALCULATION_TYPES {
        let report = client
            .streams()
            .get_values(&mut points, calculation_type, MergePolicy::Overwrite, &ValueQuery::new())
            .await;
        for failure in report.failures() {
            if let Err(e) = &failure.outcome {
                eprintln!("{} {}: {}", failure.point, calculation_type, e);
            }
        }
    }

    let mut totalizer = Totalizer::new();
    totalizer.tally(&points, &CALCULATION_TYPES);

    for point in &points {
        for calculation_type in CALCULATION_TYPES {
            let values: Vec<&Value> = match point.slot(calculation_type) {
                Slot::Single(value) => value.into_iter().collect(),
                Slot::Series(values) => values.iter().collect(),
            };
            println!("{} {} value(s) were returned for {}", values.len(), calculation_type, point.name);
            for value in values {
                println!("{} {} value at {}: {}", point.name, value.calculation_type, value.timestamp, value.value);
            }
        }
    }

    println!(
        "{} values returned - {} current, {} interpolated, {} plot, {} recorded, and {} summary",
        totalizer.total,
        totalizer.count(CalculationType::Current),
        totalizer.count(CalculationType::Interpolated),
        totalizer.count(CalculationType::Plot),
        totalizer.count(CalculationType::Recorded),
        totalizer.count(CalculationType::Summary),
    );

    Ok(())
}
