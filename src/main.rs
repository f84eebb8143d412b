use sb_rs::{
    config::Config,
    fetcher::{FetchStatus, SegmentFetcher},
    util,
};

#[tokio::main]
async fn main() {
    env_logger::init();

    // Read video from args, remaining args override the categories
    let input = std::env::args().nth(1).expect("No video URL or ID provided");
    let video_id = util::parse_video_id(&input).expect("Could not find a video ID");

    let mut config = Config::from_env();
    let categories = std::env::args().skip(2).collect::<Vec<_>>();
    if !categories.is_empty() {
        config.categories = categories.into_iter().collect();
    }

    let client = util::HttpClient::new().expect("Could not create HttpClient");
    let fetcher = SegmentFetcher::new(client, &config.instance);
    if !fetcher.is_configured() {
        println!("No SponsorBlock instance configured");
        return;
    }

    println!("Fetching segments for {}", video_id);
    fetcher.spawn_load(&video_id, &config.categories);

    match fetcher.settled().await {
        FetchStatus::Loaded { segments, .. } if segments.is_empty() => {
            println!("No segments found")
        }
        FetchStatus::Loaded { segments, .. } => {
            for segment in segments {
                println!(
                    "{:>9.2} -> {:>9.2}  {}",
                    segment.start,
                    segment.end,
                    segment.category.description().unwrap_or(segment.category.as_str())
                );
            }
        }
        FetchStatus::Failed { reason, .. } => println!("Could not load segments: {}", reason),
        FetchStatus::Idle | FetchStatus::Pending { .. } => println!("Nothing was loaded"),
    }
}
