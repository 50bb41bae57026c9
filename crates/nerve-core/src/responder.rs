//! Command routing: one inbound message in, an ordered list of replies out.
//!
//! [`Responder::handle`] is the transport-facing entry point and never fails;
//! every error is turned into a reply here. [`Responder::execute`] is the
//! fallible core, useful when a caller wants to see the error itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::command::{self, Command, Parsed};
use crate::config::{BotConfig, SessionPolicy};
use crate::error::{NerveError, Result};
use crate::payload::{self, Outbound};
use crate::roast::{self, RoastGenerator};
use crate::session::{ScopeKey, SessionRegistry, SessionState};
use crate::store::{self, BackendKind, ContentStore};
use crate::types::{Partition, MAX_CONTENT_CHARS};

const HELP_TEXT: &str = "Hello there! What do you want to know about Mr. Nerve?
/truth - Get a random truth
/dare - Get a random dare
/roastmode - Roast every truth you draw (/roastmode off to stop)
/addtruth - Add a truth (admin)
/adddare - Add a dare (admin)";

const ADMIN_MENU: &str = "Hello Admin! What do you want to do?
/deleteall - Delete all truths and dares
/deletealltruth - Delete all truths
/deletealldare - Delete all dares
/showtruths - Show all truths
/showdares - Show all dares
/addtruth <text> - Add a truth
/adddare <text> - Add a dare";

const ADMIN_GRANTED: &str = "✅ Admin mode activated!";
const INCORRECT_PASSWORD: &str = "❌ Incorrect password!";
const DENIED: &str = "⛔ You need admin rights for that. Use /admin <password> first.";
const STORE_FAILURE: &str = "❌ Something went wrong talking to the database. Try again later.";
const ROAST_ON: &str = "🔥 Roast mode activated!";
const ROAST_OFF: &str = "Roast mode deactivated.";

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A message as delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    #[serde(default)]
    pub author_is_bot: bool,
}

impl Inbound {
    pub fn new(
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            content: content.into(),
            author_is_bot: false,
        }
    }

    pub fn scope(&self) -> ScopeKey {
        ScopeKey::new(&self.channel_id, &self.author_id)
    }
}

// ---------------------------------------------------------------------------
// Responder
// ---------------------------------------------------------------------------

pub struct Responder {
    store: Arc<dyn ContentStore>,
    roaster: Arc<dyn RoastGenerator>,
    sessions: SessionRegistry,
    admin_password: Option<String>,
}

impl Responder {
    pub fn new(
        store: Arc<dyn ContentStore>,
        roaster: Arc<dyn RoastGenerator>,
        policy: SessionPolicy,
        admin_password: Option<String>,
    ) -> Self {
        Self {
            store,
            roaster,
            sessions: SessionRegistry::new(policy),
            admin_password,
        }
    }

    /// Wire up the store and roast generator selected by `config`.
    pub fn from_config(config: &BotConfig) -> Self {
        if config.admin_password().is_none() {
            warn!("ADMIN_PASSWORD not set; every /admin attempt will be refused");
        }
        Self::new(
            store::open(&config.store),
            roast::from_config(&config.roast),
            config.session,
            config.admin_password().map(str::to_string),
        )
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn backend(&self) -> BackendKind {
        self.store.backend()
    }

    pub fn roast_is_remote(&self) -> bool {
        self.roaster.is_remote()
    }

    /// Replies for `msg`, in send order. Empty when nothing should be said.
    ///
    /// The sender's scope stays locked until the replies are built, so two
    /// messages from the same scope never interleave.
    pub async fn handle(&self, msg: &Inbound) -> Vec<Outbound> {
        if msg.author_is_bot {
            return Vec::new();
        }
        let Some(parsed) = command::parse(&msg.content) else {
            return Vec::new();
        };

        let key = msg.scope();
        let cell = self.sessions.scope(&key);
        let replies = {
            let mut state = cell.lock().await;
            debug!(command = %parsed.command, scope = %key, "handling command");

            match self.execute(parsed, &mut state, Utc::now()).await {
                Ok(replies) => {
                    if parsed.command == Command::Admin {
                        info!(scope = %key, "admin rights granted");
                    }
                    replies
                }
                Err(err) => reply_for_error(&key, parsed, err),
            }
        };
        self.sessions.release(&key, cell, Utc::now());
        replies
    }

    /// Run one parsed command against `state` as of `now`.
    ///
    /// Admin-only commands from a scope without a live grant, and a wrong
    /// password, are `Unauthorized`; neither touches `state`.
    pub async fn execute(
        &self,
        parsed: Parsed<'_>,
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> Result<Vec<Outbound>> {
        let ttl = self.sessions.policy().admin_ttl;
        if parsed.command.requires_admin() && !state.admin_active(now, ttl) {
            return Err(NerveError::Unauthorized);
        }

        match parsed.command {
            Command::Hello => Ok(vec![Outbound::text(HELP_TEXT)]),
            Command::Admin => self.authenticate(parsed.args, state, now),
            Command::DeleteAll => self.delete(Partition::all()).await,
            Command::DeleteAllTruths => self.delete(&[Partition::Truths]).await,
            Command::DeleteAllDares => self.delete(&[Partition::Dares]).await,
            Command::ShowTruths => self.show(Partition::Truths).await,
            Command::ShowDares => self.show(Partition::Dares).await,
            Command::AddTruth => self.add(Partition::Truths, parsed.args).await,
            Command::AddDare => self.add(Partition::Dares, parsed.args).await,
            Command::RoastMode => Ok(set_roast_mode(parsed.args, state)),
            Command::Truth => self.draw(Partition::Truths, state.roast_mode()).await,
            Command::Dare => self.draw(Partition::Dares, false).await,
        }
    }

    fn authenticate(
        &self,
        supplied: &str,
        state: &mut SessionState,
        now: DateTime<Utc>,
    ) -> Result<Vec<Outbound>> {
        let Some(expected) = self.admin_password.as_deref() else {
            return Err(NerveError::Unauthorized);
        };
        if !secrets_match(supplied.as_bytes(), expected.as_bytes()) {
            return Err(NerveError::Unauthorized);
        }
        state.grant_admin(now);
        Ok(vec![Outbound::text(ADMIN_GRANTED), Outbound::text(ADMIN_MENU)])
    }

    /// Clear each partition in turn. One failing partition does not stop
    /// the others; the reply says which went through.
    async fn delete(&self, partitions: &[Partition]) -> Result<Vec<Outbound>> {
        let mut removed = 0u64;
        let mut cleared = Vec::new();
        let mut failed = Vec::new();
        let mut first_err = None;

        for &p in partitions {
            match self.store.clear_all(p).await {
                Ok(n) => {
                    removed += n;
                    cleared.push(p);
                }
                Err(e) => {
                    error!(partition = %p, error = %e, "clear failed");
                    failed.push(p);
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            None => {
                info!(partitions = %names(partitions), removed, "partitions cleared");
                Ok(vec![Outbound::text(format!(
                    "✅ All {} deleted! ({removed} removed)",
                    names(partitions)
                ))])
            }
            Some(e) if cleared.is_empty() => Err(e),
            Some(_) => Ok(vec![Outbound::text(format!(
                "⚠️ All {} deleted ({removed} removed), but the {} could not be deleted. Try again later.",
                names(&cleared),
                names(&failed)
            ))]),
        }
    }

    async fn show(&self, partition: Partition) -> Result<Vec<Outbound>> {
        let entries = self.store.list_all(partition).await?;
        if entries.is_empty() {
            return Ok(vec![Outbound::text(not_found(partition))]);
        }
        let mut replies = vec![Outbound::text(format!("Here are all the {partition}:"))];
        replies.extend(payload::chunk_listing(plural_title(partition), &entries));
        Ok(replies)
    }

    async fn add(&self, partition: Partition, text: &str) -> Result<Vec<Outbound>> {
        let id = self.store.append(partition, text).await?;
        debug!(partition = %partition, id, "entry added");
        Ok(vec![Outbound::text(format!(
            "✅ {} added!",
            singular_title(partition)
        ))])
    }

    async fn draw(&self, partition: Partition, roast: bool) -> Result<Vec<Outbound>> {
        let Some(entry) = self.store.get_random(partition).await? else {
            return Ok(vec![Outbound::text(not_found(partition))]);
        };
        let mut replies = vec![Outbound::entry(partition, &entry.content)];
        if roast {
            replies.push(Outbound::text(self.roaster.roast(&entry.content).await));
        }
        Ok(replies)
    }
}

fn set_roast_mode(args: &str, state: &mut SessionState) -> Vec<Outbound> {
    let on = !matches!(args.to_lowercase().as_str(), "off" | "stop" | "disable");
    state.set_roast_mode(on);
    vec![Outbound::text(if on { ROAST_ON } else { ROAST_OFF })]
}

/// The user-visible reply for a failed command. Detail stays in the log.
fn reply_for_error(key: &ScopeKey, parsed: Parsed<'_>, err: NerveError) -> Vec<Outbound> {
    let text = match err {
        NerveError::Unauthorized => {
            info!(scope = %key, command = %parsed.command, "command denied");
            if parsed.command == Command::Admin {
                INCORRECT_PASSWORD.to_string()
            } else {
                DENIED.to_string()
            }
        }
        NerveError::InvalidContent => {
            let noun = parsed.command.partition().map_or("entry", Partition::singular);
            if parsed.args.is_empty() {
                format!("❌ Please provide a {noun} to add.")
            } else {
                format!("❌ That {noun} is too long (max {MAX_CONTENT_CHARS} characters).")
            }
        }
        NerveError::StoreUnavailable(detail) => {
            error!(scope = %key, command = %parsed.command, error = %detail, "store unavailable");
            match (parsed.command, parsed.command.partition()) {
                (Command::Truth | Command::Dare, Some(p)) => not_found(p),
                _ => STORE_FAILURE.to_string(),
            }
        }
        other => {
            error!(scope = %key, command = %parsed.command, error = %other, "command failed");
            STORE_FAILURE.to_string()
        }
    };
    vec![Outbound::text(text)]
}

fn not_found(partition: Partition) -> String {
    format!("No {partition} found.")
}

fn singular_title(partition: Partition) -> &'static str {
    match partition {
        Partition::Truths => "Truth",
        Partition::Dares => "Dare",
    }
}

fn plural_title(partition: Partition) -> &'static str {
    match partition {
        Partition::Truths => "Truths",
        Partition::Dares => "Dares",
    }
}

fn names(partitions: &[Partition]) -> String {
    partitions
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Equality that does not stop at the first differing byte.
fn secrets_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roast::{StaticRoaster, DISABLED_FALLBACK};
    use crate::store::SqliteStore;
    use crate::types::Entry;
    use async_trait::async_trait;
    use chrono::Duration as CDur;
    use std::time::Duration;
    use tempfile::TempDir;

    const PASSWORD: &str = "Sesame";

    fn sqlite(dir: &TempDir) -> SqliteStore {
        SqliteStore::new(dir.path().join("nerve.db"), Duration::from_secs(5))
    }

    async fn ready(dir: &TempDir) -> Responder {
        let store = sqlite(dir);
        store.ensure_schema().await.unwrap();
        Responder::new(
            Arc::new(store),
            Arc::new(StaticRoaster),
            SessionPolicy::default(),
            Some(PASSWORD.into()),
        )
    }

    fn say(author: &str, content: &str) -> Inbound {
        Inbound::new("c1", author, content)
    }

    fn texts(replies: &[Outbound]) -> Vec<String> {
        replies.iter().map(Outbound::render_plain).collect()
    }

    async fn login(r: &Responder, author: &str) {
        let replies = r.handle(&say(author, &format!("/admin {PASSWORD}"))).await;
        assert_eq!(texts(&replies)[0], ADMIN_GRANTED);
    }

    /// Fails every call touching one of `broken`; otherwise delegates.
    struct BrokenStore {
        inner: SqliteStore,
        broken: Vec<Partition>,
    }

    impl BrokenStore {
        fn check(&self, p: Partition) -> Result<()> {
            if self.broken.contains(&p) {
                Err(NerveError::store("connection refused"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ContentStore for BrokenStore {
        fn backend(&self) -> BackendKind {
            BackendKind::Sqlite
        }
        async fn ensure_schema(&self) -> Result<()> {
            self.inner.ensure_schema().await
        }
        async fn get_random(&self, p: Partition) -> Result<Option<Entry>> {
            self.check(p)?;
            self.inner.get_random(p).await
        }
        async fn append(&self, p: Partition, content: &str) -> Result<i64> {
            self.check(p)?;
            self.inner.append(p, content).await
        }
        async fn list_all(&self, p: Partition) -> Result<Vec<Entry>> {
            self.check(p)?;
            self.inner.list_all(p).await
        }
        async fn clear_all(&self, p: Partition) -> Result<u64> {
            self.check(p)?;
            self.inner.clear_all(p).await
        }
    }

    async fn broken(dir: &TempDir, broken: Vec<Partition>) -> Responder {
        let inner = sqlite(dir);
        inner.ensure_schema().await.unwrap();
        Responder::new(
            Arc::new(BrokenStore { inner, broken }),
            Arc::new(StaticRoaster),
            SessionPolicy::default(),
            Some(PASSWORD.into()),
        )
    }

    #[tokio::test]
    async fn truth_or_dare_walkthrough() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;

        assert_eq!(texts(&r.handle(&say("alice", "/truth")).await), ["No truths found."]);

        let denied = r.handle(&say("alice", "/addtruth hello world")).await;
        assert_eq!(texts(&denied), [DENIED]);
        assert!(r.store().list_all(Partition::Truths).await.unwrap().is_empty());

        login(&r, "alice").await;
        let added = r.handle(&say("alice", "/addtruth hello world")).await;
        assert_eq!(texts(&added), ["✅ Truth added!"]);

        let drawn = r.handle(&say("alice", "/truth")).await;
        assert_eq!(drawn, vec![Outbound::entry(Partition::Truths, "hello world")]);
    }

    #[tokio::test]
    async fn admin_commands_without_grant_are_unauthorized() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        let mut state = SessionState::default();

        for text in ["/deleteall", "/showdares", "/adddare jump"] {
            let err = r
                .execute(command::parse(text).unwrap(), &mut state, Utc::now())
                .await
                .unwrap_err();
            assert!(matches!(err, NerveError::Unauthorized), "{text}: {err:?}");
        }
    }

    #[tokio::test]
    async fn wrong_password_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        let mut state = SessionState::default();
        let now = Utc::now();

        let wrong = command::parse("/admin sesame").unwrap();
        let err = r.execute(wrong, &mut state, now).await.unwrap_err();
        assert!(matches!(err, NerveError::Unauthorized));
        assert_eq!(state, SessionState::default());

        let login_text = format!("/admin {PASSWORD}");
        let right = command::parse(&login_text).unwrap();
        r.execute(right, &mut state, now).await.unwrap();
        let before = state.clone();
        r.execute(wrong, &mut state, now).await.unwrap_err();
        assert_eq!(state, before);

        assert_eq!(
            texts(&r.handle(&say("mallory", "/admin guess")).await),
            [INCORRECT_PASSWORD]
        );
    }

    #[tokio::test]
    async fn admin_grant_is_per_author_and_channel() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        login(&r, "alice").await;

        assert_eq!(texts(&r.handle(&say("bob", "/adddare sing")).await), [DENIED]);

        let elsewhere = Inbound::new("c2", "alice", "/adddare sing");
        assert_eq!(texts(&r.handle(&elsewhere).await), [DENIED]);

        assert_eq!(
            texts(&r.handle(&say("alice", "/adddare sing")).await),
            ["✅ Dare added!"]
        );
        let ids = r.sessions().authorized_identities(Utc::now()).await;
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn admin_grant_expires_after_ttl() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        let mut state = SessionState::default();
        let t0 = Utc::now();
        let show = command::parse("/showtruths").unwrap();

        r.execute(command::parse(&format!("/admin {PASSWORD}")).unwrap(), &mut state, t0)
            .await
            .unwrap();
        assert!(r.execute(show, &mut state, t0 + CDur::minutes(30)).await.is_ok());
        let err = r
            .execute(show, &mut state, t0 + CDur::hours(2))
            .await
            .unwrap_err();
        assert!(matches!(err, NerveError::Unauthorized));
    }

    #[tokio::test]
    async fn unset_password_refuses_every_login() {
        let dir = TempDir::new().unwrap();
        let store = sqlite(&dir);
        store.ensure_schema().await.unwrap();
        let r = Responder::new(
            Arc::new(store),
            Arc::new(StaticRoaster),
            SessionPolicy::default(),
            None,
        );
        assert_eq!(texts(&r.handle(&say("alice", "/admin ")).await), [INCORRECT_PASSWORD]);
        assert_eq!(texts(&r.handle(&say("alice", "/admin x")).await), [INCORRECT_PASSWORD]);
    }

    #[tokio::test]
    async fn roast_without_generator_adds_fallback_message() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        r.store().append(Partition::Truths, "I hum while I eat").await.unwrap();

        assert_eq!(texts(&r.handle(&say("alice", "/roastmode")).await), [ROAST_ON]);
        let replies = r.handle(&say("alice", "/truth")).await;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0], Outbound::entry(Partition::Truths, "I hum while I eat"));
        assert_eq!(replies[1], Outbound::text(DISABLED_FALLBACK));

        // Roast mode belongs to alice only.
        assert_eq!(r.handle(&say("bob", "/truth")).await.len(), 1);

        assert_eq!(texts(&r.handle(&say("alice", "/roastmode OFF")).await), [ROAST_OFF]);
        assert_eq!(r.handle(&say("alice", "/truth")).await.len(), 1);
    }

    #[tokio::test]
    async fn dares_are_never_roasted() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        r.store().append(Partition::Dares, "do a handstand").await.unwrap();
        r.handle(&say("alice", "/roastmode")).await;
        let replies = r.handle(&say("alice", "/dare")).await;
        assert_eq!(replies, vec![Outbound::entry(Partition::Dares, "do a handstand")]);
    }

    #[tokio::test]
    async fn delete_all_truth_leaves_dares() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        r.store().append(Partition::Truths, "t1").await.unwrap();
        r.store().append(Partition::Truths, "t2").await.unwrap();
        r.store().append(Partition::Dares, "d1").await.unwrap();
        login(&r, "alice").await;

        let replies = r.handle(&say("alice", "/deletealltruth")).await;
        assert_eq!(texts(&replies), ["✅ All truths deleted! (2 removed)"]);
        assert!(r.store().list_all(Partition::Truths).await.unwrap().is_empty());
        assert_eq!(r.store().list_all(Partition::Dares).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_clears_both() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        r.store().append(Partition::Truths, "t1").await.unwrap();
        r.store().append(Partition::Dares, "d1").await.unwrap();
        login(&r, "alice").await;

        let replies = r.handle(&say("alice", "/DeleteAll")).await;
        assert_eq!(texts(&replies), ["✅ All truths and dares deleted! (2 removed)"]);
        for p in Partition::all() {
            assert!(r.store().get_random(*p).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn show_chunks_long_listings() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        for i in 0..23 {
            r.store().append(Partition::Truths, &format!("t{i}")).await.unwrap();
        }
        login(&r, "alice").await;

        let replies = r.handle(&say("alice", "/showtruths")).await;
        assert_eq!(replies.len(), 4);
        assert_eq!(replies[0], Outbound::text("Here are all the truths:"));
        let Outbound::Card(first) = &replies[1] else {
            panic!("expected card")
        };
        assert_eq!(first.title, "Truths (1–10 of 23)");

        assert_eq!(
            texts(&r.handle(&say("alice", "/showdares")).await),
            ["No dares found."]
        );
    }

    #[tokio::test]
    async fn add_keeps_case_and_rejects_blank() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        login(&r, "alice").await;

        r.handle(&say("alice", "/ADDTRUTH   I Love ABBA  ")).await;
        let all = r.store().list_all(Partition::Truths).await.unwrap();
        assert_eq!(all[0].content, "I Love ABBA");

        assert_eq!(
            texts(&r.handle(&say("alice", "/addtruth    ")).await),
            ["❌ Please provide a truth to add."]
        );
        let long = format!("/adddare {}", "x".repeat(MAX_CONTENT_CHARS + 1));
        assert!(texts(&r.handle(&say("alice", &long)).await)[0].contains("too long"));
        assert_eq!(r.store().list_all(Partition::Truths).await.unwrap().len(), 1);
        assert!(r.store().list_all(Partition::Dares).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_commands_and_bots_get_no_reply() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        assert!(r.handle(&say("alice", "just chatting")).await.is_empty());
        assert!(r.handle(&say("alice", "/truthy")).await.is_empty());

        let mut from_bot = say("nerve", "/hello");
        from_bot.author_is_bot = true;
        assert!(r.handle(&from_bot).await.is_empty());
    }

    #[tokio::test]
    async fn hi_and_hello_show_help() {
        let dir = TempDir::new().unwrap();
        let r = ready(&dir).await;
        for text in ["/hi", "/Hello"] {
            let replies = texts(&r.handle(&say("alice", text)).await);
            assert_eq!(replies.len(), 1);
            assert!(replies[0].contains("/truth"));
            assert!(replies[0].contains("/roastmode"));
        }
    }

    #[tokio::test]
    async fn unavailable_store_degrades_per_command() {
        let dir = TempDir::new().unwrap();
        let r = broken(&dir, vec![Partition::Truths, Partition::Dares]).await;

        assert_eq!(texts(&r.handle(&say("alice", "/truth")).await), ["No truths found."]);
        assert_eq!(texts(&r.handle(&say("alice", "/dare")).await), ["No dares found."]);

        let mut state = SessionState::default();
        let err = r
            .execute(command::parse("/truth").unwrap(), &mut state, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, NerveError::StoreUnavailable(_)));

        login(&r, "alice").await;
        for text in ["/addtruth hi", "/showdares", "/deleteall"] {
            assert_eq!(texts(&r.handle(&say("alice", text)).await), [STORE_FAILURE], "{text}");
        }
    }

    #[tokio::test]
    async fn partial_delete_reports_both_outcomes() {
        let dir = TempDir::new().unwrap();
        let r = broken(&dir, vec![Partition::Dares]).await;
        r.store().append(Partition::Truths, "t1").await.unwrap();
        login(&r, "alice").await;

        let reply = texts(&r.handle(&say("alice", "/deleteall")).await).remove(0);
        assert!(reply.contains("All truths deleted (1 removed)"), "{reply}");
        assert!(reply.contains("the dares could not be deleted"), "{reply}");
    }

    #[tokio::test]
    async fn one_off_senders_leave_no_session_behind() {
        let dir = TempDir::new().unwrap();
        let store = sqlite(&dir);
        store.ensure_schema().await.unwrap();
        let r = Responder::new(
            Arc::new(store),
            Arc::new(StaticRoaster),
            SessionPolicy {
                admin_ttl: Some(Duration::from_millis(1)),
            },
            Some(PASSWORD.into()),
        );

        for i in 0..200 {
            r.handle(&say(&format!("user{i}"), "/truth")).await;
        }
        login(&r, "alice").await;
        assert!(r.sessions().len() <= 1, "{} sessions", r.sessions().len());

        tokio::time::sleep(Duration::from_millis(20)).await;
        r.handle(&say("alice", "/truth")).await;
        assert!(r.sessions().is_empty());

        r.handle(&say("bob", "/roastmode")).await;
        assert_eq!(r.sessions().len(), 1);
        r.handle(&say("bob", "/roastmode off")).await;
        assert!(r.sessions().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_scopes_do_not_lose_writes() {
        let dir = TempDir::new().unwrap();
        let r = Arc::new(ready(&dir).await);
        let authors = ["alice", "bob", "carol", "dave"];
        for a in authors {
            login(&r, a).await;
        }

        let mut tasks = Vec::new();
        for a in authors {
            for i in 0..5 {
                let r = r.clone();
                tasks.push(tokio::spawn(async move {
                    r.handle(&say(a, &format!("/addtruth {a} {i}"))).await
                }));
            }
        }
        for t in tasks {
            assert_eq!(texts(&t.await.unwrap()), ["✅ Truth added!"]);
        }
        assert_eq!(r.store().list_all(Partition::Truths).await.unwrap().len(), 20);
    }

    #[test]
    fn secrets_match_is_exact() {
        assert!(secrets_match(b"Sesame", b"Sesame"));
        assert!(!secrets_match(b"sesame", b"Sesame"));
        assert!(!secrets_match(b"Sesam", b"Sesame"));
        assert!(!secrets_match(b"", b"Sesame"));
    }
}
