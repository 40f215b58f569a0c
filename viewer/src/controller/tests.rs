use std::time::Duration;

use chatlog_client::StaticSource;
use serde_json::{Value, json};

use super::*;

const SHROUD_ID: &str = "37402112";

#[derive(Debug, Default)]
struct MemoryView {
    title: Option<String>,
    lines: Vec<String>,
    alerts: Vec<String>,
    reject_show: bool,
}

impl ChatView for MemoryView {
    fn show(&mut self, title: &str, lines: &[String]) -> Result<(), anyhow::Error> {
        if self.reject_show {
            anyhow::bail!("display unavailable");
        }
        self.title = Some(title.to_string());
        self.lines = lines.to_vec();
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

fn user_record(id: &str, login: &str) -> Value {
    json!([{ "id": id, "login": login, "displayName": login }])
}

fn shroud_source(ep: &Endpoints) -> StaticSource {
    StaticSource::new()
        .with(ep.user_lookup("shroud"), user_record(SHROUD_ID, "shroud"))
        .with(
            ep.channel_logs(SHROUD_ID, DEFAULT_LOG_LIMIT),
            json!([
                { "username": "viewer1", "message": "hi Kappa" },
                { "username": "viewer2", "message": "LUL test" }
            ]),
        )
        .with(
            ep.seventv_channel(SHROUD_ID),
            json!({ "emote_set": { "emotes": [{ "id": "k", "name": "Kappa" }] } }),
        )
        .with(
            ep.bttv_channel(SHROUD_ID),
            json!({ "channelEmotes": [{ "id": "l", "code": "LUL" }], "sharedEmotes": [] }),
        )
}

fn controller(source: StaticSource) -> ViewController<StaticSource, MemoryView> {
    ViewController::new(
        source,
        Endpoints::default(),
        LoadOptions::default(),
        MemoryView::default(),
    )
}

#[tokio::test]
async fn renders_channel_logs_with_emotes() {
    let ep = Endpoints::default();
    let c = controller(shroud_source(&ep));

    let state = c.load("shroud", "").await.unwrap();

    assert_eq!(state, ViewState::Rendered { lines: 2 });
    c.with_view(|view| {
        assert_eq!(view.title.as_deref(), Some("shroud"));
        assert_eq!(view.lines.len(), 2);
        for line in &view.lines {
            assert_eq!(line.matches(r#"class="emote""#).count(), 1);
        }
        assert!(view.lines[0].contains("viewer1:"));
        assert!(view.lines[0].contains(r#"<span class="message">hi <img class="emote" src="https://cdn.7tv.app/emote/k/3x.webp""#));
        assert!(view.lines[1].contains(r#"title="LUL"> test</span>"#));
        assert!(view.alerts.is_empty());
    });
}

#[tokio::test]
async fn unknown_channel_fails_before_any_other_fetch() {
    let ep = Endpoints::default();
    let source = StaticSource::new().with(ep.user_lookup("doesnotexist12345"), json!([]));
    let c = controller(source);

    let state = c.load("doesnotexist12345", "").await.unwrap();

    assert_eq!(state, ViewState::Failed(LoadFailure::ChannelNotFound));
    assert_eq!(c.state(), state);
    assert_eq!(c.source().requests(), vec![ep.user_lookup("doesnotexist12345")]);
    c.with_view(|view| {
        assert_eq!(view.alerts, vec!["Channel not found.".to_string()]);
        assert!(view.title.is_none());
    });
}

#[tokio::test]
async fn blank_channel_stays_idle() {
    let c = controller(StaticSource::new());

    let state = c.load("   ", "someone").await.unwrap();

    assert_eq!(state, ViewState::Idle);
    assert!(c.source().requests().is_empty());
    c.with_view(|view| assert_eq!(view.alerts, vec![ENTER_CHANNEL.to_string()]));
}

#[tokio::test]
async fn input_is_trimmed_and_lowercased() {
    let ep = Endpoints::default();
    let c = controller(shroud_source(&ep));

    let state = c.load("  SHROUD ", "").await.unwrap();

    assert_eq!(state, ViewState::Rendered { lines: 2 });
    assert_eq!(c.source().requests()[0], ep.user_lookup("shroud"));
}

#[tokio::test]
async fn unavailable_logs_fail_the_load() {
    let ep = Endpoints::default();
    let source = StaticSource::new()
        .with(ep.user_lookup("shroud"), user_record(SHROUD_ID, "shroud"))
        .with_status(ep.channel_logs(SHROUD_ID, DEFAULT_LOG_LIMIT), 500);
    let c = controller(source);

    let state = c.load("shroud", "").await.unwrap();

    assert_eq!(state, ViewState::Failed(LoadFailure::NoLogsFound));
    c.with_view(|view| {
        assert_eq!(view.alerts, vec!["No logs found.".to_string()]);
        assert!(view.lines.is_empty());
    });
}

#[tokio::test]
async fn empty_logs_fail_the_load() {
    let ep = Endpoints::default();
    let source = StaticSource::new()
        .with(ep.user_lookup("shroud"), user_record(SHROUD_ID, "shroud"))
        .with(ep.channel_logs(SHROUD_ID, DEFAULT_LOG_LIMIT), json!([]));
    let c = controller(source);

    let state = c.load("shroud", "").await.unwrap();
    assert_eq!(state, ViewState::Failed(LoadFailure::NoLogsFound));
}

#[tokio::test]
async fn catalog_failures_still_render() {
    let ep = Endpoints::default();
    let source = StaticSource::new()
        .with(ep.user_lookup("shroud"), user_record(SHROUD_ID, "shroud"))
        .with(
            ep.channel_logs(SHROUD_ID, DEFAULT_LOG_LIMIT),
            json!([{ "username": "a", "message": "Kappa <3" }]),
        );
    let c = controller(source);

    let state = c.load("shroud", "").await.unwrap();

    assert_eq!(state, ViewState::Rendered { lines: 1 });
    c.with_view(|view| {
        assert!(!view.lines[0].contains("<img"));
        assert!(view.lines[0].contains("Kappa &lt;3"));
    });
}

#[tokio::test]
async fn user_filter_uses_user_scoped_logs() {
    let ep = Endpoints::default();
    let source = StaticSource::new()
        .with(ep.user_lookup("shroud"), user_record(SHROUD_ID, "shroud"))
        .with(ep.user_lookup("viewer1"), user_record("555", "viewer1"))
        .with(
            ep.user_logs(SHROUD_ID, "555", DEFAULT_LOG_LIMIT),
            json!({ "messages": [{ "username": "viewer1", "text": "hello" }] }),
        );
    let c = controller(source);

    let state = c.load("shroud", "Viewer1").await.unwrap();

    assert_eq!(state, ViewState::Rendered { lines: 1 });
    c.with_view(|view| assert_eq!(view.title.as_deref(), Some("shroud / viewer1")));
}

#[tokio::test]
async fn unknown_user_filter_finds_no_logs() {
    let ep = Endpoints::default();
    let source = shroud_source(&ep).with(ep.user_lookup("ghost"), json!([]));
    let c = controller(source);

    let state = c.load("shroud", "ghost").await.unwrap();

    assert_eq!(state, ViewState::Failed(LoadFailure::NoLogsFound));
    assert!(
        !c.source()
            .requests()
            .contains(&ep.channel_logs(SHROUD_ID, DEFAULT_LOG_LIMIT))
    );
}

#[tokio::test]
async fn system_messages_are_skipped() {
    let ep = Endpoints::default();
    let source = StaticSource::new()
        .with(ep.user_lookup("shroud"), user_record(SHROUD_ID, "shroud"))
        .with(
            ep.channel_logs(SHROUD_ID, DEFAULT_LOG_LIMIT),
            json!([
                { "username": "" },
                { "username": "a", "message": "still here" }
            ]),
        );
    let c = controller(source);

    let state = c.load("shroud", "").await.unwrap();
    assert_eq!(state, ViewState::Rendered { lines: 1 });
}

#[tokio::test]
async fn newest_load_wins_over_slower_older_one() {
    let ep = Endpoints::default();
    let source = shroud_source(&ep)
        .with(ep.user_lookup("slow"), user_record("1", "slow"))
        .with(
            ep.channel_logs("1", DEFAULT_LOG_LIMIT),
            json!([{ "username": "old", "message": "stale" }]),
        )
        .with_delay(ep.user_lookup("slow"), Duration::from_millis(100));
    let c = controller(source);

    let (slow, fast) = tokio::join!(c.load("slow", ""), c.load("shroud", ""));

    let fast = fast.unwrap();
    assert_eq!(fast, ViewState::Rendered { lines: 2 });
    assert_eq!(slow.unwrap(), fast);
    assert_eq!(c.state(), fast);
    c.with_view(|view| {
        assert_eq!(view.title.as_deref(), Some("shroud"));
        assert!(view.lines.iter().all(|line| !line.contains("stale")));
    });
}

#[tokio::test]
async fn repeated_loads_rebuild_catalogs() {
    let ep = Endpoints::default();
    let source = shroud_source(&ep)
        .with(ep.user_lookup("other"), user_record("2", "other"))
        .with(
            ep.channel_logs("2", DEFAULT_LOG_LIMIT),
            json!([{ "username": "a", "message": "Kappa" }]),
        );
    let c = controller(source);

    c.load("shroud", "").await.unwrap();
    c.load("other", "").await.unwrap();

    c.with_view(|view| {
        assert_eq!(view.lines.len(), 1);
        assert!(!view.lines[0].contains("<img"));
    });
}

#[tokio::test]
async fn view_write_failure_ends_failed() {
    let ep = Endpoints::default();
    let c = controller(shroud_source(&ep));
    c.with_view(|view| view.reject_show = true);

    let err = c.load("shroud", "").await.unwrap_err();

    assert_eq!(err.to_string(), "display unavailable");
    assert_eq!(c.state(), ViewState::Failed(LoadFailure::DisplayFailed));
}

#[tokio::test]
async fn ffz_room_is_fetched_once_per_load() {
    let ep = Endpoints::default();
    let source = shroud_source(&ep).with(
        ep.ffz_room(SHROUD_ID),
        json!({
            "room": { "moderator_badge": "//cdn.ffz/mod/1" },
            "sets": { "1": { "emoticons": [{ "name": "OMEGALUL", "urls": { "1": "//cdn.ffz/o1" } }] } }
        }),
    );
    let c = controller(source);

    c.load("shroud", "").await.unwrap();
    c.load("shroud", "").await.unwrap();

    let room_requests = c
        .source()
        .requests()
        .iter()
        .filter(|url| **url == ep.ffz_room(SHROUD_ID))
        .count();
    assert_eq!(room_requests, 2);
}
