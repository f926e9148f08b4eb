//! Acceptance tests for browsing refs and their history
//!
//! Drives the ref view and commit view together, wired the way the app wires
//! them, against an in-memory repository.

use chrono::DateTime;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use refscope::model::{Action, Branch, Commit, Head, Oid, Tag, ViewError};
use refscope::repo::{Completion, MemoryRepo, RepoData};
use refscope::view::{display_channel, CommitView, DisplayUpdates, RefListener, RefView, Theme};
use std::sync::{Arc, Mutex};
use std::thread;

// ===== Test Fixtures =====

fn oid(raw: &str) -> Oid {
    Oid::new(raw).unwrap()
}

fn history(len: usize) -> Vec<Commit> {
    (0..len)
        .map(|n| Commit {
            oid: oid(&format!("{:010x}", n + 1)),
            author_name: "Linus".to_string(),
            author_when: DateTime::parse_from_rfc3339("2023-11-02T18:30:00-04:00").unwrap(),
            summary: format!("commit {n}"),
        })
        .collect()
}

fn repository(completion: Completion) -> Arc<MemoryRepo> {
    let main = Branch::new("main", oid("1111111111"));
    let feature = Branch::new("feature", oid("2222222222"));
    Arc::new(
        MemoryRepo::new(Head::on_branch(main.clone()))
            .with_branches(vec![feature, main])
            .with_tags(vec![Tag::new("v0.1", oid("3333333333"))])
            .with_commits(oid("1111111111"), history(30))
            .with_commits(oid("2222222222"), history(5))
            .with_completion(completion),
    )
}

struct Browser {
    refs: RefView,
    commits: Arc<CommitView>,
    updates: DisplayUpdates,
}

fn browser(repo: Arc<MemoryRepo>) -> Browser {
    let (updater, updates) = display_channel();
    let shared: Arc<dyn RepoData> = repo;
    let commits = Arc::new(CommitView::new(
        Arc::clone(&shared),
        updater.clone(),
        Theme::default(),
    ));
    let mut refs = RefView::new(shared, updater, Theme::default());
    refs.register_listener(Arc::clone(&commits) as Arc<dyn RefListener>);
    Browser {
        refs,
        commits,
        updates,
    }
}

// ===== Scenario: Returning to a branch resumes its history =====

#[test]
fn reselecting_branch_resumes_history_position() {
    // GIVEN: the browser opened on main, with the commit cursor moved down
    let repo = repository(Completion::Immediate);
    let browser = browser(Arc::clone(&repo));
    browser.refs.initialise().unwrap();
    for _ in 0..12 {
        browser.commits.handle_action(Action::NextLine).unwrap();
    }
    let mut buf = Buffer::empty(Rect::new(0, 0, 60, 7));
    browser.commits.render(buf.area, &mut buf).unwrap();
    let scrolled = browser.commits.view_index(&oid("1111111111")).unwrap();
    assert_eq!(scrolled.active_index, 12);
    assert_eq!(scrolled.view_start_index, 8);

    // WHEN: feature is selected, then main again
    browser.refs.handle_action(Action::PrevLine).unwrap();
    browser.refs.handle_action(Action::Select).unwrap();
    assert_eq!(browser.commits.active_oid(), Some(oid("2222222222")));
    browser.refs.handle_action(Action::NextLine).unwrap();
    browser.refs.handle_action(Action::Select).unwrap();

    // THEN: main's cursor is where it was and its history was loaded once
    assert_eq!(browser.commits.active_oid(), Some(oid("1111111111")));
    assert_eq!(
        browser.commits.view_index(&oid("1111111111")),
        Some(scrolled)
    );
    assert_eq!(repo.commit_load_count(&oid("1111111111")), 1);
    assert_eq!(repo.commit_load_count(&oid("2222222222")), 1);
}

// ===== Scenario: Detached HEAD =====

#[test]
fn detached_head_is_listed_and_counted() {
    // GIVEN: HEAD detached at a commit no branch points to
    let head_oid = oid("abcdef1234567890abcdef1234567890abcdef12");
    let repo = Arc::new(MemoryRepo::new(Head::detached(head_oid.clone())));
    let browser = browser(repo);

    // WHEN: the browser opens
    browser.refs.initialise().unwrap();

    // THEN: the detached row comes first and the header counts it
    assert_eq!(browser.refs.rows()[1].text(), "   HEAD detached at abcdef1");
    assert_eq!(browser.commits.active_oid(), Some(head_oid));
    browser.refs.handle_action(Action::FirstLine).unwrap();
    assert_eq!(browser.refs.footer_text().as_deref(), Some("Branches: 1"));
}

// ===== Scenario: Listener failure =====

struct Failing;

impl RefListener for Failing {
    fn on_ref_select(&self, _ref_name: &str, _oid: &Oid) -> Result<(), ViewError> {
        Err(ViewError::Render("downstream view unavailable".to_string()))
    }
}

struct Counting(Mutex<usize>);

impl RefListener for Counting {
    fn on_ref_select(&self, _ref_name: &str, _oid: &Oid) -> Result<(), ViewError> {
        *self.0.lock().unwrap() += 1;
        Ok(())
    }
}

#[test]
fn failing_listener_keeps_earlier_effects_and_skips_later_ones() {
    // GIVEN: commit view, a failing listener, then a counting listener
    let repo = repository(Completion::Immediate);
    let mut browser = browser(Arc::clone(&repo));
    browser.refs.initialise().unwrap();
    let counter = Arc::new(Counting(Mutex::new(0)));
    browser.refs.register_listener(Arc::new(Failing));
    browser
        .refs
        .register_listener(Arc::clone(&counter) as Arc<dyn RefListener>);

    // WHEN: feature is selected
    browser.refs.handle_action(Action::PrevLine).unwrap();
    let err = browser.refs.handle_action(Action::Select).unwrap_err();

    // THEN: the failure is returned, the commit view already switched, and
    // the counting listener never ran
    assert!(matches!(err, ViewError::Listener { .. }));
    assert_eq!(browser.commits.active_oid(), Some(oid("2222222222")));
    assert_eq!(*counter.0.lock().unwrap(), 0);
}

// ===== Scenario: Loads complete on background threads =====

#[test]
fn loads_completing_on_other_threads_are_safe_to_render() {
    // GIVEN: loads that finish only when released
    let repo = repository(Completion::Deferred);
    let browser = browser(Arc::clone(&repo));
    browser.refs.initialise().unwrap();
    browser.updates.drain();

    // WHEN: another thread releases them while this one keeps rendering
    let remote = Arc::clone(&repo);
    let loader = thread::spawn(move || {
        remote.complete_tags();
        remote.complete_branches();
        remote.complete_commits(&oid("1111111111"));
    });
    let mut buf = Buffer::empty(Rect::new(0, 0, 30, 10));
    for _ in 0..50 {
        browser.refs.render(buf.area, &mut buf).unwrap();
        // Cursor first: rows read afterwards are never older than it.
        let active = browser.refs.view_pos().active_row_index;
        let rows = browser.refs.rows();
        assert!(rows[active].is_selectable());
    }
    loader.join().unwrap();

    // THEN: every load shows up and each completion asked for a repaint
    assert_eq!(browser.refs.rows().len(), 5);
    assert_eq!(browser.refs.view_pos().active_row_index, 2);
    assert!(!browser.commits.is_loading());
    assert_eq!(browser.updates.drain(), 2);
}

// ===== Scenario: Initialisation failure =====

#[test]
fn branch_listing_failure_aborts_initialisation() {
    // GIVEN: a repository whose branches cannot be listed
    let main = Branch::new("main", oid("1111111111"));
    let repo = Arc::new(MemoryRepo::new(Head::on_branch(main)).failing_branches());
    let browser = browser(repo);

    // WHEN / THEN: initialisation reports the data load failure and nobody
    // was told about HEAD
    let err = browser.refs.initialise().unwrap_err();
    assert!(matches!(err, ViewError::DataLoad(_)));
    assert_eq!(browser.commits.active_oid(), None);
}
