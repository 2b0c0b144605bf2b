use anyhow::Result;
use api::run_api;
use clap::{Parser, Subcommand};
use geo_index::{
    backfill_user_geo, distance_between, distance_label, seeded_source, thread_source,
    RandomSource,
};
use log::{error, info};
use reconcile::{draw_plan, GeoJsonRenderer, MarkerData, MarkerRenderPlan};
use std::thread;
use store::{fetch_app_data, load_users};
use types::{Bounds, Coordinate, MapConfig, MarkerKey, PlaceType};
use util::{read_json, write_json};

fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

#[derive(Parser)]
#[command(version, about, long_about)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the markers to draw, or write them as GeoJSON.
    Plan {
        #[arg(short, long)]
        config_path: String,

        /// Comma separated place types to show. All types when omitted.
        #[arg(short, long, value_delimiter = ',')]
        types: Vec<PlaceType>,

        #[arg(long)]
        show_all_users: bool,

        /// Map center used for nearest users, defaults to the initial location.
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,

        #[arg(long, conflicts_with = "selected_user")]
        selected_place: Option<i64>,

        #[arg(long)]
        selected_user: Option<i64>,

        #[arg(short, long)]
        geojson_output_path: Option<String>,

        /// Seed for synthesized user coordinates.
        #[arg(long)]
        seed: Option<u64>,
    },
    Nearest {
        #[arg(short, long)]
        config_path: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(short)]
        k: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },
    Distance {
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        from_lng: f64,

        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        to_lng: f64,
    },
    /// Replace user coordinates with points inside a region.
    SynthUsers {
        #[arg(short, long)]
        users_path: String,

        #[arg(short, long)]
        output_path: String,

        #[arg(long, default_value_t = Bounds::DEMO_REGION.lat_min)]
        lat_min: f64,

        #[arg(long, default_value_t = Bounds::DEMO_REGION.lat_range)]
        lat_range: f64,

        #[arg(long, default_value_t = Bounds::DEMO_REGION.lng_min)]
        lng_min: f64,

        #[arg(long, default_value_t = Bounds::DEMO_REGION.lng_range)]
        lng_range: f64,

        #[arg(long)]
        seed: Option<u64>,
    },
    Serve {
        #[arg(short, long)]
        config_path: String,

        #[arg(short, long, default_value_t = 8090)]
        port: u16,

        #[arg(long, default_value_t = default_thread_count())]
        threads: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[ntex::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Args::parse();

    match cli.command {
        Commands::Plan {
            config_path,
            types,
            show_all_users,
            lat,
            lng,
            selected_place,
            selected_user,
            geojson_output_path,
            seed,
        } => {
            let config = map_config(&config_path)?;
            let mut store = fetch_app_data(&config, &mut *random_source(seed))?;

            if let (Some(lat), Some(lng)) = (lat, lng) {
                store.set_map_center(Some(Coordinate::new(lat, lng)));
            }
            if !types.is_empty() {
                store.set_place_type_filter(types.into_iter().collect());
            }
            store.set_show_all_users(show_all_users);
            if let Some(id) = selected_place {
                store.select_marker(MarkerKey::Place(id))?;
            }
            if let Some(id) = selected_user {
                store.select_marker(MarkerKey::User(id))?;
            }

            let plan = store.render_plan();
            info!("{} markers to draw", plan.len());

            if let Some(output_path) = geojson_output_path {
                let mut renderer = GeoJsonRenderer::new();
                draw_plan(&mut renderer, &plan);
                std::fs::write(output_path, renderer.into_feature_collection().to_string())?;
            } else {
                for row in plan_rows(&plan, store.reference_point()) {
                    println!("{row}");
                }
            }
        }
        Commands::Nearest {
            config_path,
            lat,
            lng,
            k,
            seed,
        } => {
            let config = map_config(&config_path)?;
            let store = fetch_app_data(&config, &mut *random_source(seed))?;
            let reference = Coordinate::new(lat, lng);

            let k = k.unwrap_or(store.nearest_count());
            for user in geo_index::nearest_users(store.users(), reference, k) {
                println!(
                    "{:>4}  {:<28} {}",
                    user.id,
                    user.name,
                    distance_label(reference, user.address.geo)
                );
            }
        }
        Commands::Distance {
            from_lat,
            from_lng,
            to_lat,
            to_lng,
        } => {
            let from = Coordinate::new(from_lat, from_lng);
            let to = Coordinate::new(to_lat, to_lng);
            println!(
                "{:.1} m ({})",
                distance_between(from, to),
                distance_label(from, to)
            );
        }
        Commands::SynthUsers {
            users_path,
            output_path,
            lat_min,
            lat_range,
            lng_min,
            lng_range,
            seed,
        } => {
            let bounds = Bounds {
                lat_min,
                lat_range,
                lng_min,
                lng_range,
            };
            let mut users = load_users(&users_path)?;
            backfill_user_geo(&mut users, &bounds, &mut *random_source(seed));
            write_json(&output_path, &users)?;
            info!("wrote {} users to {}", users.len(), output_path);
        }
        Commands::Serve {
            config_path,
            port,
            threads,
            seed,
        } => {
            let config = map_config(&config_path)?;
            let store = fetch_app_data(&config, &mut *random_source(seed))?;
            run_api(store, Some(config), port, threads).await?;
        }
    }
    Ok(())
}

fn map_config(config_path: &str) -> Result<MapConfig> {
    read_json(config_path).inspect_err(|e| error!("Error: {e:#}"))
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(seeded_source(seed)),
        None => Box::new(thread_source()),
    }
}

fn plan_rows(plan: &MarkerRenderPlan<'_>, reference: Option<Coordinate>) -> Vec<String> {
    plan.entries()
        .iter()
        .map(|entry| {
            let marker = MarkerData::from_entry(entry);
            let [lat, lng] = marker.coordinates;
            let distance = reference
                .map(|reference| distance_label(reference, entry.item.coordinates()))
                .unwrap_or_default();
            format!(
                "{} {:<10} {:>4}  {:<28} {:>10.6} {:>10.6}  {}",
                if marker.active { '*' } else { ' ' },
                marker.marker_type,
                entry.item.id(),
                marker.name,
                lat,
                lng,
                distance
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::{all_place_types, build_render_plan, filter_places};
    use types::Place;

    #[test]
    fn test_plan_arguments() {
        let args = Args::try_parse_from([
            "placemap",
            "plan",
            "-c",
            "config.json",
            "--types",
            "cafe,park",
            "--lat",
            "48.46",
            "--lng",
            "35.05",
            "--selected-place",
            "2",
        ])
        .unwrap();

        match args.command {
            Commands::Plan {
                types,
                lat,
                selected_place,
                show_all_users,
                ..
            } => {
                assert_eq!(types, vec![PlaceType::Cafe, PlaceType::Park]);
                assert_eq!(lat, Some(48.46));
                assert_eq!(selected_place, Some(2));
                assert!(!show_all_users);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_rejects_unknown_place_type() {
        assert!(Args::try_parse_from(["placemap", "plan", "-c", "c.json", "-t", "bank"]).is_err());
    }

    #[test]
    fn test_both_selections_conflict() {
        assert!(Args::try_parse_from([
            "placemap",
            "plan",
            "-c",
            "c.json",
            "--selected-place",
            "1",
            "--selected-user",
            "1",
        ])
        .is_err());
    }

    #[test]
    fn test_negative_coordinates() {
        let args = Args::try_parse_from([
            "placemap",
            "distance",
            "--from-lat",
            "-33.8688",
            "--from-lng",
            "151.2093",
            "--to-lat",
            "40.7128",
            "--to-lng",
            "-74.0060",
        ])
        .unwrap();

        assert!(matches!(
            args.command,
            Commands::Distance { from_lat, .. } if from_lat == -33.8688
        ));
    }

    #[test]
    fn test_plan_rows() {
        let places = vec![Place {
            id: 4,
            name: "Menora".to_string(),
            place_type: PlaceType::Museum,
            coordinates: Coordinate::new(48.4605, 35.048),
        }];
        let filtered = filter_places(&places, &all_place_types());
        let plan = build_render_plan(&filtered, &[], &[], false, None);

        let rows = plan_rows(&plan, Some(Coordinate::new(48.4605, 35.048)));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("  museum        4  Menora"), "{}", rows[0]);
        assert!(rows[0].ends_with("48.460500  35.048000  0.0 km"), "{}", rows[0]);
    }
}
