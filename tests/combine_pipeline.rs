//! End-to-end pipeline tests over local source files.

use std::fs;
use std::path::Path;

use m3u_combine::config::Config;
use m3u_combine::mapping::GroupOverride;
use m3u_combine::services::CombineService;

fn write_source(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn config_with_output(dir: &Path) -> (Config, String) {
    let output = dir.join("combined.m3u").to_str().unwrap().to_string();
    let mut config = Config::default();
    config.output.file = output.clone();
    (config, output)
}

#[tokio::test]
async fn dedupe_across_two_sources() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_source(
        dir.path(),
        "a.m3u",
        "#EXTM3U\n#EXTINF:-1,A\nhttp://x/1\n",
    );
    let b = write_source(dir.path(), "b.m3u", "http://x/1\nhttp://x/1\n");
    let (config, output) = config_with_output(dir.path());

    let summary = CombineService::new(config)
        .run(&[a, b])
        .await
        .unwrap();

    assert_eq!(summary.sources_ok, 2);
    assert_eq!(summary.entries_written, 1);
    let text = fs::read_to_string(output).unwrap();
    assert_eq!(text, "#EXTM3U\n#EXTINF:-1,A\nhttp://x/1\n");
}

#[tokio::test]
async fn failed_source_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_source(dir.path(), "good.m3u", "#EXTM3U\nhttp://x/1\n");
    let (config, output) = config_with_output(dir.path());

    let summary = CombineService::new(config)
        .run(&["/nonexistent/bad.m3u".to_string(), good])
        .await
        .unwrap();

    assert_eq!(summary.sources_failed, 1);
    assert_eq!(summary.sources_ok, 1);
    assert!(summary.output_written);
    assert!(fs::read_to_string(output).unwrap().contains("http://x/1"));
}

#[tokio::test]
async fn all_sources_failing_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (config, output) = config_with_output(dir.path());
    fs::write(&output, "#EXTM3U\nhttp://previous/good\n").unwrap();

    let summary = CombineService::new(config)
        .run(&[
            "/nonexistent/one.m3u".to_string(),
            "/nonexistent/two.m3u".to_string(),
        ])
        .await
        .unwrap();

    assert!(!summary.output_written);
    assert_eq!(summary.sources_failed, 2);
    // The previously good output must not be clobbered.
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "#EXTM3U\nhttp://previous/good\n"
    );
}

#[tokio::test]
async fn header_only_sources_produce_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_source(dir.path(), "a.m3u", "#EXTM3U\n");
    let (config, output) = config_with_output(dir.path());

    let summary = CombineService::new(config).run(&[a]).await.unwrap();

    assert_eq!(summary.sources_ok, 1);
    assert!(!summary.output_written);
    assert!(!Path::new(&output).exists());
}

#[tokio::test]
async fn grouped_output_with_overrides_and_pin() {
    let dir = tempfile::tempdir().unwrap();
    let sports = write_source(
        dir.path(),
        "sports-provider.m3u",
        "#EXTM3U\n#EXTINF:-1,Match Of The Day\nhttp://s/1\n",
    );
    let misc = write_source(
        dir.path(),
        "misc.m3u",
        concat!(
            "#EXTM3U\n",
            "#EXTINF:-1 group-title=\"News\",World News\nhttp://n/1\n",
            "#EXTINF:-1,Favourite\nhttp://f/1\n",
        ),
    );
    let (mut config, output) = config_with_output(dir.path());
    config.merge.group = true;
    config.merge.pin = Some("Favourite".to_string());
    config.annotate.group_overrides = vec![GroupOverride {
        pattern: "sports-provider".to_string(),
        label: "Sports".to_string(),
    }];

    CombineService::new(config)
        .run(&[sports, misc])
        .await
        .unwrap();

    let text = fs::read_to_string(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "#EXTM3U");
    // Pinned entry comes before any group section.
    assert_eq!(lines[1], "#EXTINF:-1,Favourite");
    assert_eq!(lines[2], "http://f/1");
    // Groups in lexicographic order: News before Sports.
    let news_marker = lines.iter().position(|l| *l == "# ===== News =====");
    let sports_marker = lines.iter().position(|l| *l == "# ===== Sports =====");
    assert!(news_marker.unwrap() < sports_marker.unwrap());
    assert!(text.contains("group-title=\"Sports\""));
}

#[tokio::test]
async fn catchup_and_folding_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_source(
        dir.path(),
        "a.m3u",
        concat!(
            "#EXTM3U\n",
            "#EXTINF:-1,One\n",
            "#EXTVLCOPT:http-user-agent=Agent/1.0\n",
            "http://x/1?token=t\n",
            "#EXTINF:-1,Two\n",
            "rtsp://x/2\n",
        ),
    );
    let (mut config, output) = config_with_output(dir.path());
    config.annotate.catchup = true;
    config.annotate.fold_headers = true;

    CombineService::new(config).run(&[a]).await.unwrap();

    let text = fs::read_to_string(output).unwrap();
    // Catch-up lands on the URL before the folded suffix; rtsp is untouched.
    assert!(text.contains("http://x/1?token=t&catchup-days=7|User-Agent=Agent/1.0\n"));
    assert!(text.contains("\nrtsp://x/2\n"));
    assert!(!text.contains("#EXTVLCOPT"));
}
