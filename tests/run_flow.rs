//! End-to-end pipeline-step scenarios over fake ports.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::sync::{Arc, Mutex};

use syndicate::commands::run::run_step;
use syndicate::context::ServiceContext;
use syndicate::ports::{
    CommitClient, CommitFuture, CredentialStore, JobStore, PostSource, PostsFuture, SiloAdapter,
    SyndicateFuture,
};
use syndicate::post::Post;
use syndicate::results::{RunResults, SiloId, SyndicationResult};
use syndicate::silos::SiloRegistry;

struct FakeCredentials(BTreeMap<String, String>);

impl CredentialStore for FakeCredentials {
    fn get(&self, var: &str) -> Option<String> {
        self.0.get(var).cloned()
    }
}

struct FakePosts(Vec<Post>);

impl PostSource for FakePosts {
    fn changed_posts(&self) -> PostsFuture<'_> {
        let posts = self.0.clone();
        Box::pin(async move { Ok(posts) })
    }
}

#[derive(Default)]
struct MemJobStore(Mutex<RunResults>);

impl JobStore for MemJobStore {
    fn load(&self) -> Result<RunResults, Box<dyn Error + Send + Sync>> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save(&self, results: &RunResults) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.0.lock().unwrap() = results.clone();
        Ok(())
    }
}

#[derive(Default)]
struct RecordingCommits {
    calls: Mutex<Vec<(BTreeMap<String, String>, BTreeSet<String>)>>,
}

impl CommitClient for RecordingCommits {
    fn commit_posts(
        &self,
        files: &BTreeMap<String, String>,
        silos: &BTreeSet<String>,
    ) -> CommitFuture<'_> {
        self.calls.lock().unwrap().push((files.clone(), silos.clone()));
        Box::pin(async move { Ok("deadbeef".to_string()) })
    }
}

/// Adapter returning a fixed id for every post lacking one, counting calls.
struct ScriptedSilo {
    name: &'static str,
    id: SiloId,
    calls: Arc<Mutex<usize>>,
}

impl SiloAdapter for ScriptedSilo {
    fn name(&self) -> &'static str {
        self.name
    }

    fn syndicate(&self, posts: &[Post], _api_key: &str) -> SyndicateFuture<'_> {
        *self.calls.lock().unwrap() += 1;
        let posts = posts.to_vec();
        let id = self.id.clone();
        let name = self.name;
        Box::pin(async move {
            let mut result = SyndicationResult::default();
            for post in &posts {
                match post.silo_id(name)? {
                    Some(existing) => {
                        result.modified.insert(post.path.clone(), Some(existing));
                    }
                    None => {
                        result.added.insert(post.path.clone(), Some(id.clone()));
                    }
                }
            }
            Ok(result)
        })
    }
}

struct Harness {
    ctx: ServiceContext,
    commits: Arc<RecordingCommits>,
    job: Arc<MemJobStore>,
    dev_calls: Arc<Mutex<usize>>,
}

fn harness(posts: Vec<Post>, credentials: &[(&str, &str)]) -> Harness {
    let commits = Arc::new(RecordingCommits::default());
    let job = Arc::new(MemJobStore::default());
    let dev_calls = Arc::new(Mutex::new(0));

    let mut registry = SiloRegistry::new();
    registry.register(Arc::new(ScriptedSilo {
        name: "dev",
        id: SiloId::Int(42),
        calls: dev_calls.clone(),
    }));
    registry.register(Arc::new(ScriptedSilo {
        name: "medium",
        id: SiloId::Text("abc123".into()),
        calls: Arc::new(Mutex::new(0)),
    }));

    let ctx = ServiceContext {
        credentials: Box::new(FakeCredentials(
            credentials.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
        )),
        posts: Box::new(FakePosts(posts)),
        job: Box::new(ArcStore(job.clone())),
        commits: Box::new(ArcCommits(commits.clone())),
        registry,
    };
    Harness { ctx, commits, job, dev_calls }
}

/// Newtype forwarding so the harness can keep shared handles to its ports.
struct ArcStore(Arc<MemJobStore>);

impl JobStore for ArcStore {
    fn load(&self) -> Result<RunResults, Box<dyn Error + Send + Sync>> {
        self.0.load()
    }

    fn save(&self, results: &RunResults) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.0.save(results)
    }
}

struct ArcCommits(Arc<RecordingCommits>);

impl CommitClient for ArcCommits {
    fn commit_posts(
        &self,
        files: &BTreeMap<String, String>,
        silos: &BTreeSet<String>,
    ) -> CommitFuture<'_> {
        self.0.commit_posts(files, silos)
    }
}

fn hello_post() -> Post {
    Post::parse("posts/hello.md", "---\ntitle: Hello\n---\nHi.\n").unwrap()
}

fn silos(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn syndicates_and_marks_a_new_post() {
    let h = harness(vec![hello_post()], &[("DEV_API_KEY", "k")]);
    run_step(&h.ctx, &silos(&["dev"]), true).await.unwrap();

    // The adapter ran once and its id was committed into the front matter.
    assert_eq!(*h.dev_calls.lock().unwrap(), 1);
    let calls = h.commits.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (files, involved) = &calls[0];
    assert!(files["posts/hello.md"].contains("dev_syndicate_id: 42"));
    assert_eq!(involved.iter().collect::<Vec<_>>(), vec!["dev"]);
}

#[tokio::test]
async fn a_marked_post_is_updated_not_recreated() {
    let post = Post::parse(
        "posts/hello.md",
        "---\ntitle: Hello\ndev_syndicate_id: 42\n---\nHi again.\n",
    )
    .unwrap();
    let h = harness(vec![post], &[("DEV_API_KEY", "k")]);
    run_step(&h.ctx, &silos(&["dev"]), true).await.unwrap();

    // The post landed in the modified bucket, so there is nothing to mark
    // and no commit is created.
    assert!(h.commits.calls.lock().unwrap().is_empty());
    let accumulated = h.job.load().unwrap();
    let dev = accumulated["dev"].as_ref().unwrap();
    assert!(dev.added.is_empty());
    assert_eq!(dev.modified["posts/hello.md"], Some(SiloId::Int(42)));
}

#[tokio::test]
async fn no_posts_is_a_clean_no_op() {
    let h = harness(Vec::new(), &[("DEV_API_KEY", "k")]);
    run_step(&h.ctx, &silos(&["dev"]), true).await.unwrap();

    assert_eq!(*h.dev_calls.lock().unwrap(), 0);
    assert!(h.commits.calls.lock().unwrap().is_empty());
    assert!(h.job.load().unwrap().is_empty());
}

#[tokio::test]
async fn results_accumulate_across_steps_in_one_job() {
    let h = harness(vec![hello_post()], &[("DEV_API_KEY", "k"), ("MEDIUM_API_KEY", "k")]);

    // Step 1 targets dev only; step 2 targets medium only. The store ends
    // up holding both silos' results.
    run_step(&h.ctx, &silos(&["dev"]), false).await.unwrap();
    run_step(&h.ctx, &silos(&["medium"]), false).await.unwrap();

    let accumulated = h.job.load().unwrap();
    assert!(accumulated.contains_key("dev"));
    assert!(accumulated.contains_key("medium"));
    assert!(h.commits.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn deferred_marking_uses_the_full_accumulation() {
    let h = harness(vec![hello_post()], &[("DEV_API_KEY", "k"), ("MEDIUM_API_KEY", "k")]);

    run_step(&h.ctx, &silos(&["dev"]), false).await.unwrap();
    run_step(&h.ctx, &silos(&["medium"]), false).await.unwrap();
    // A final step with no silo filter marks everything accumulated so far.
    run_step(&h.ctx, &[], true).await.unwrap();

    let calls = h.commits.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (files, involved) = &calls[0];
    assert_eq!(involved.len(), 2);
    let document = &files["posts/hello.md"];
    assert!(document.contains("dev_syndicate_id: 42"));
    assert!(document.contains("medium_syndicate_id: abc123"));
}

#[tokio::test]
async fn ineligible_silos_produce_no_results_and_no_commit() {
    // dev has no API key; medium is never requested.
    let h = harness(vec![hello_post()], &[]);
    run_step(&h.ctx, &silos(&["dev"]), true).await.unwrap();

    assert_eq!(*h.dev_calls.lock().unwrap(), 0);
    assert!(h.commits.calls.lock().unwrap().is_empty());
    assert!(h.job.load().unwrap().is_empty());
}
