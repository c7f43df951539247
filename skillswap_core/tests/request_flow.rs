use skillswap_core::blob::PhotoUpload;
use skillswap_core::profile::RequesterSummary;
use skillswap_core::store::ProfileRepository;
use skillswap_core::{
    ConnectionGraphManager, Decision, GraphError, Profile, ProfileId, ProfileUpdate,
    RequestOutcome, UserId, Visibility,
};

mod common;
use common::manager;

async fn profile_for(manager: &ConnectionGraphManager, name: &str) -> (UserId, Profile) {
    let user = UserId::new();
    let profile = manager
        .upsert_profile(user, ProfileUpdate::named(name), None)
        .await
        .expect("creating a profile should succeed");
    (user, profile)
}

#[tokio::test]
async fn upsert_creates_then_merges() {
    let (manager, _, _) = manager();
    let owner = UserId::new();

    let created = manager
        .upsert_profile(
            owner,
            ProfileUpdate::named("Ada").with_skills(&["Guitar"], &["Piano"]),
            None,
        )
        .await
        .unwrap();
    assert_eq!(created.owner, owner);
    assert_eq!(created.visibility, Visibility::Public);

    let merged = manager
        .upsert_profile(
            owner,
            ProfileUpdate {
                location: Some("Lyon".into()),
                ..ProfileUpdate::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(merged.id, created.id, "upsert must not create a second profile");
    assert_eq!(merged.name, "Ada");
    assert_eq!(merged.skills_offered, vec!["Guitar"]);
    assert_eq!(merged.location.as_deref(), Some("Lyon"));
}

#[tokio::test]
async fn upsert_is_idempotent_on_identical_input() {
    let (manager, store, _) = manager();
    let owner = UserId::new();
    let update = ProfileUpdate::named("Ada").with_skills(&["Guitar", "Guitar"], &["Piano"]);

    manager.upsert_profile(owner, update.clone(), None).await.unwrap();
    let first = store.get_by_owner(owner).await.unwrap().unwrap();

    manager.upsert_profile(owner, update, None).await.unwrap();
    let second = store.get_by_owner(owner).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(second.skills_offered, vec!["Guitar", "Guitar"]);
}

#[tokio::test]
async fn blank_or_missing_name_is_rejected() {
    let (manager, store, _) = manager();
    let owner = UserId::new();

    let blank = manager
        .upsert_profile(owner, ProfileUpdate::named("   "), None)
        .await
        .expect_err("blank name must fail");
    assert!(matches!(blank, GraphError::ValidationFailed(_)));

    let missing = manager
        .upsert_profile(owner, ProfileUpdate::default(), None)
        .await
        .expect_err("a new profile needs a name");
    assert!(matches!(missing, GraphError::ValidationFailed(_)));
    assert!(store.get_by_owner(owner).await.unwrap().is_none());

    manager
        .upsert_profile(owner, ProfileUpdate::named("Ada"), None)
        .await
        .unwrap();
    let renamed_blank = manager
        .upsert_profile(owner, ProfileUpdate::named(""), None)
        .await
        .expect_err("name must never become blank");
    assert!(matches!(renamed_blank, GraphError::ValidationFailed(_)));
    assert_eq!(manager.get_profile(owner).await.unwrap().name, "Ada");
}

#[tokio::test]
async fn photo_goes_through_blob_store() {
    let (manager, _, blobs) = manager();
    let owner = UserId::new();

    let photo = PhotoUpload {
        bytes: vec![0x89, b'P', b'N', b'G'],
        file_name: Some("me.png".into()),
        content_type: Some("image/png".into()),
    };
    let profile = manager
        .upsert_profile(owner, ProfileUpdate::named("Ada"), Some(photo))
        .await
        .unwrap();
    assert_eq!(profile.photo_url.as_deref(), Some("mem://photos/1.png"));

    let gif = PhotoUpload {
        bytes: vec![1],
        file_name: Some("me.gif".into()),
        content_type: None,
    };
    let err = manager
        .upsert_profile(owner, ProfileUpdate::default(), Some(gif))
        .await
        .expect_err("gif is not an accepted format");
    assert!(matches!(err, GraphError::ValidationFailed(_)));
    assert_eq!(blobs.upload_count(), 1);
    assert_eq!(
        manager.get_profile(owner).await.unwrap().photo_url.as_deref(),
        Some("mem://photos/1.png")
    );
}

#[tokio::test]
async fn listing_hides_self_and_private_profiles() {
    let (manager, _, _) = manager();
    let (ada, _) = profile_for(&manager, "Ada").await;
    let (bob, bob_profile) = profile_for(&manager, "Bob").await;
    let carol = UserId::new();
    manager
        .upsert_profile(
            carol,
            ProfileUpdate::named("Carol").with_visibility(Visibility::Private),
            None,
        )
        .await
        .unwrap();

    let listed = manager.list_public_profiles(ada).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner, bob);
    assert!(!listed[0].requested_by_me);

    manager.request_connection(ada, bob_profile.id).await.unwrap();
    let listed = manager.list_public_profiles(ada).await.unwrap();
    assert!(listed[0].requested_by_me);

    let for_bob = manager.list_public_profiles(bob).await.unwrap();
    assert!(for_bob.iter().all(|p| p.owner != bob && p.owner != carol));
}

#[tokio::test]
async fn requesting_twice_keeps_a_single_entry() {
    let (manager, _, _) = manager();
    let (ada, _) = profile_for(&manager, "Ada").await;
    let (bob, bob_profile) = profile_for(&manager, "Bob").await;

    let first = manager.request_connection(ada, bob_profile.id).await.unwrap();
    assert_eq!(
        first,
        RequestOutcome::Sent {
            profile_id: bob_profile.id,
            request_count: 1
        }
    );

    let second = manager.request_connection(ada, bob_profile.id).await.unwrap();
    assert!(matches!(second, RequestOutcome::AlreadyRequested { request_count: 1, .. }));
    assert_eq!(second.message(), "Already requested");

    let bob_now = manager.get_profile(bob).await.unwrap();
    assert_eq!(bob_now.incoming_requests, vec![ada]);
}

#[tokio::test]
async fn request_preconditions() {
    let (manager, _, _) = manager();
    let (ada, ada_profile) = profile_for(&manager, "Ada").await;

    let missing = manager
        .request_connection(ada, ProfileId::new())
        .await
        .expect_err("unknown target");
    assert!(matches!(missing, GraphError::NotFound(_)));

    let own = manager
        .request_connection(ada, ada_profile.id)
        .await
        .expect_err("self request");
    assert!(matches!(own, GraphError::InvalidOperation(_)));
    assert!(manager.get_profile(ada).await.unwrap().incoming_requests.is_empty());
}

#[tokio::test]
async fn approve_connects_both_sides() {
    let (manager, _, _) = manager();
    let (ada, ada_profile) = profile_for(&manager, "Ada").await;
    let (bob, _) = profile_for(&manager, "Bob").await;

    manager.request_connection(bob, ada_profile.id).await.unwrap();
    let outcome = manager
        .resolve_request(ada, bob, Decision::Approve)
        .await
        .unwrap();
    assert_eq!(outcome.message(), "Request approved");

    let ada_now = manager.get_profile(ada).await.unwrap();
    let bob_now = manager.get_profile(bob).await.unwrap();
    assert_eq!(ada_now.connections, vec![bob]);
    assert_eq!(bob_now.connections, vec![ada]);
    assert!(ada_now.incoming_requests.is_empty());

    let again = manager.request_connection(bob, ada_profile.id).await.unwrap();
    assert!(matches!(again, RequestOutcome::AlreadyConnected { .. }));
    assert!(manager.get_profile(ada).await.unwrap().incoming_requests.is_empty());
}

#[tokio::test]
async fn approve_clears_crossed_requests() {
    let (manager, _, _) = manager();
    let (ada, ada_profile) = profile_for(&manager, "Ada").await;
    let (bob, bob_profile) = profile_for(&manager, "Bob").await;

    manager.request_connection(bob, ada_profile.id).await.unwrap();
    manager.request_connection(ada, bob_profile.id).await.unwrap();
    manager
        .resolve_request(ada, bob, Decision::Approve)
        .await
        .unwrap();

    let bob_now = manager.get_profile(bob).await.unwrap();
    assert_eq!(bob_now.connections, vec![ada]);
    assert!(
        bob_now.incoming_requests.is_empty(),
        "a connection must not also be a pending request"
    );
}

#[tokio::test]
async fn reject_returns_to_absent() {
    let (manager, _, _) = manager();
    let (ada, ada_profile) = profile_for(&manager, "Ada").await;
    let (bob, _) = profile_for(&manager, "Bob").await;

    manager.request_connection(bob, ada_profile.id).await.unwrap();
    let outcome = manager
        .resolve_request(ada, bob, Decision::Reject)
        .await
        .unwrap();
    assert_eq!(outcome.message(), "Request rejected");

    let ada_now = manager.get_profile(ada).await.unwrap();
    assert!(ada_now.incoming_requests.is_empty());
    assert!(ada_now.connections.is_empty());
    assert!(manager.get_profile(bob).await.unwrap().connections.is_empty());

    let resent = manager.request_connection(bob, ada_profile.id).await.unwrap();
    assert!(resent.is_sent());
}

#[tokio::test]
async fn resolving_unknown_request_changes_nothing() {
    let (manager, store, _) = manager();
    let (ada, _) = profile_for(&manager, "Ada").await;
    let (bob, _) = profile_for(&manager, "Bob").await;
    let before = store.get_by_owner(ada).await.unwrap().unwrap();

    for decision in [Decision::Approve, Decision::Reject] {
        let err = manager
            .resolve_request(ada, bob, decision)
            .await
            .expect_err("no pending request");
        assert!(matches!(err, GraphError::NotFound(_)));
    }

    assert_eq!(store.get_by_owner(ada).await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn approving_a_requester_without_profile_is_refused() {
    let (manager, _, _) = manager();
    let (ada, ada_profile) = profile_for(&manager, "Ada").await;
    let ghost = UserId::new();

    manager.request_connection(ghost, ada_profile.id).await.unwrap();

    let requests = manager.get_incoming_requests(ada).await.unwrap();
    assert_eq!(requests, vec![RequesterSummary::anonymous(ghost)]);

    let err = manager
        .resolve_request(ada, ghost, Decision::Approve)
        .await
        .expect_err("requester has no profile");
    assert!(matches!(err, GraphError::NotFound(_)));

    let ada_now = manager.get_profile(ada).await.unwrap();
    assert_eq!(ada_now.incoming_requests, vec![ghost], "request stays pending");
    assert!(ada_now.connections.is_empty());

    manager
        .resolve_request(ada, ghost, Decision::Reject)
        .await
        .expect("rejecting still works");
}

#[tokio::test]
async fn incoming_requests_need_a_profile() {
    let (manager, _, _) = manager();
    let err = manager
        .get_incoming_requests(UserId::new())
        .await
        .expect_err("no profile yet");
    assert!(matches!(err, GraphError::NotFound(_)));
}

#[tokio::test]
async fn two_users_swap_skills_end_to_end() {
    let (manager, _, _) = manager();
    let ada = UserId::new();
    let bob = UserId::new();

    let ada_profile = manager
        .upsert_profile(
            ada,
            ProfileUpdate::named("Ada").with_skills(&["Guitar"], &["Piano"]),
            None,
        )
        .await
        .unwrap();
    manager
        .upsert_profile(
            bob,
            ProfileUpdate::named("Bob").with_skills(&["Piano"], &["Guitar"]),
            None,
        )
        .await
        .unwrap();

    assert!(manager
        .request_connection(bob, ada_profile.id)
        .await
        .unwrap()
        .is_sent());

    let requests = manager.get_incoming_requests(ada).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user, bob);
    assert_eq!(requests[0].name.as_deref(), Some("Bob"));
    assert_eq!(requests[0].skills_offered, vec!["Piano"]);

    manager
        .resolve_request(ada, bob, Decision::Approve)
        .await
        .unwrap();

    let ada_now = manager.get_profile(ada).await.unwrap();
    let bob_now = manager.get_profile(bob).await.unwrap();
    assert!(ada_now.connections.contains(&bob));
    assert!(bob_now.connections.contains(&ada));
    assert!(ada_now.incoming_requests.is_empty());
}
