//! End-to-end tests for the directory layer over the in-memory store.
//!
//! Every operation runs through `MemoryDatabase::transact`, so each test also
//! exercises commit and conflict retry the way applications use the layer.

use std::collections::HashSet;

use quiver::Directory;
use quiver::DirectoryError;
use quiver::DirectoryLayer;
use quiver::DirectoryOutput;
use quiver::MemoryDatabase;
use quiver::ReadTransaction;
use quiver::Transaction;
use quiver::Tuple;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn create_or_open(
    db: &MemoryDatabase,
    dl: &DirectoryLayer,
    path: &[&str],
    layer: Option<&[u8]>,
) -> Result<DirectoryOutput, DirectoryError> {
    db.transact(|tr| {
        let dl = dl.clone();
        async move { dl.create_or_open(&tr, path, layer).await }
    })
    .await
}

async fn exists(db: &MemoryDatabase, dl: &DirectoryLayer, path: &[&str]) -> bool {
    db.read_transact(|tr| {
        let dl = dl.clone();
        async move { dl.exists(&tr, path).await }
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_create_or_open_is_idempotent() {
    init_tracing();
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    let first = create_or_open(&db, &dl, &["app", "users"], Some(b"table".as_slice())).await.unwrap();
    let second = create_or_open(&db, &dl, &["app", "users"], Some(b"table".as_slice())).await.unwrap();
    let untagged = create_or_open(&db, &dl, &["app", "users"], None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(untagged.prefix().unwrap(), first.prefix().unwrap());
    assert_eq!(untagged.layer(), b"table");
}

#[tokio::test]
async fn test_layer_mismatch_fails_on_open() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    db.transact(|tr| {
        let dl = dl.clone();
        async move { dl.create(&tr, &["a"], Some(b"X".as_slice())).await }
    })
    .await
    .unwrap();

    let err = db
        .read_transact(|tr| {
            let dl = dl.clone();
            async move { dl.open(&tr, &["a"], Some(b"Y".as_slice())).await }
        })
        .await
        .unwrap_err();
    match err {
        DirectoryError::IncompatibleLayer { path, expected, actual } => {
            assert_eq!(path, vec!["a".to_string()]);
            assert_eq!(expected, b"Y");
            assert_eq!(actual, b"X");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_move_keeps_physical_prefix() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    let original = create_or_open(&db, &dl, &["a"], None).await.unwrap();
    let data_key = original.pack(&Tuple::new().push("k")).unwrap();
    db.transact(|tr| {
        let data_key = data_key.clone();
        async move {
            tr.set(&data_key, b"v");
            Ok::<_, DirectoryError>(())
        }
    })
    .await
    .unwrap();

    let moved = db
        .transact(|tr| {
            let dl = dl.clone();
            async move { dl.move_directory(&tr, &["a"], &["b"]).await }
        })
        .await
        .unwrap();

    assert!(!exists(&db, &dl, &["a"]).await);
    assert!(exists(&db, &dl, &["b"]).await);
    assert_eq!(moved.prefix().unwrap(), original.prefix().unwrap());
    assert_eq!(moved.path(), &["b".to_string()]);

    let value = db
        .read_transact(|tr| {
            let data_key = data_key.clone();
            async move { tr.get(&data_key, false).await }
        })
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some(b"v".as_slice()));
}

#[tokio::test]
async fn test_move_into_own_subtree_fails() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();
    create_or_open(&db, &dl, &["a"], None).await.unwrap();

    let err = db
        .transact(|tr| {
            let dl = dl.clone();
            async move { dl.move_directory(&tr, &["a"], &["a", "child"]).await }
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::MoveCycle));
    assert!(exists(&db, &dl, &["a"]).await);
}

#[tokio::test]
async fn test_remove_cascades_to_children_and_data() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    create_or_open(&db, &dl, &["a"], None).await.unwrap();
    let child = create_or_open(&db, &dl, &["a", "b"], None).await.unwrap();
    let data_key = child.pack(&Tuple::new().push(7i64)).unwrap();
    db.transact(|tr| {
        let data_key = data_key.clone();
        async move {
            tr.set(&data_key, b"payload");
            Ok::<_, DirectoryError>(())
        }
    })
    .await
    .unwrap();

    let removed = db
        .transact(|tr| {
            let dl = dl.clone();
            async move { dl.remove(&tr, &["a"]).await }
        })
        .await
        .unwrap();
    assert!(removed);

    assert!(!exists(&db, &dl, &["a"]).await);
    assert!(!exists(&db, &dl, &["a", "b"]).await);
    let value = db
        .read_transact(|tr| {
            let data_key = data_key.clone();
            async move { tr.get(&data_key, false).await }
        })
        .await
        .unwrap();
    assert_eq!(value, None);

    let removed_again = db
        .transact(|tr| {
            let dl = dl.clone();
            async move { dl.remove(&tr, &["a"]).await }
        })
        .await
        .unwrap();
    assert!(!removed_again);
}

#[tokio::test]
async fn test_manual_prefix_collisions_rejected() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    db.transact(|tr| {
        let dl = dl.clone();
        async move { dl.create_prefix(&tr, &["owner"], None, b"\x01\x02").await }
    })
    .await
    .unwrap();

    let taken: [&[u8]; 3] = [b"\x01\x02", b"\x01", b"\x01\x02\x03"];
    for prefix in taken {
        let err = db
            .transact(|tr| {
                let dl = dl.clone();
                async move { dl.create_prefix(&tr, &["intruder"], None, prefix).await }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::PrefixInUse { .. }), "prefix {prefix:?} accepted");
    }

    let sibling = db
        .transact(|tr| {
            let dl = dl.clone();
            async move { dl.create_prefix(&tr, &["sibling"], None, b"\x01\x03").await }
        })
        .await
        .unwrap();
    assert_eq!(sibling.prefix().unwrap(), b"\x01\x03");
}

#[tokio::test]
async fn test_directory_subspace_keys_round_trip() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();
    let users = create_or_open(&db, &dl, &["app", "users"], None).await.unwrap();

    let key = Tuple::new().push("alice").push(-3i64).push(b"\x00raw".as_slice()).push(());
    let packed = users.pack(&key).unwrap();
    assert!(users.contains(&packed).unwrap());
    assert_eq!(users.unpack(&packed).unwrap(), key);

    let (begin, end) = users.range().unwrap();
    assert!(begin.as_slice() < packed.as_slice() && packed.as_slice() < end.as_slice());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_of_same_path_agrees_on_prefix() {
    init_tracing();
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let db = db.clone();
        let dl = dl.clone();
        handles.push(tokio::spawn(async move {
            create_or_open(&db, &dl, &["shared", "queue"], None).await.unwrap()
        }));
    }

    let mut prefixes = HashSet::new();
    for handle in handles {
        let output = handle.await.unwrap();
        prefixes.insert(output.prefix().unwrap().to_vec());
    }
    assert_eq!(prefixes.len(), 1);

    let children = db
        .read_transact(|tr| {
            let dl = dl.clone();
            async move { dl.list(&tr, &["shared"]).await }
        })
        .await
        .unwrap();
    assert_eq!(children, vec!["queue".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_of_distinct_paths_gets_distinct_prefixes() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    let mut handles = Vec::new();
    for i in 0..32 {
        let db = db.clone();
        let dl = dl.clone();
        handles.push(tokio::spawn(async move {
            let name = format!("tenant-{i}");
            create_or_open(&db, &dl, &["tenants", name.as_str()], None).await.unwrap()
        }));
    }

    let mut prefixes = HashSet::new();
    for handle in handles {
        let output = handle.await.unwrap();
        assert!(prefixes.insert(output.prefix().unwrap().to_vec()));
    }

    // No prefix may be a prefix of another.
    for a in &prefixes {
        for b in &prefixes {
            if a != b {
                assert!(!b.starts_with(a), "{a:?} is a prefix of {b:?}");
            }
        }
    }

    let children = db
        .read_transact(|tr| {
            let dl = dl.clone();
            async move { dl.list(&tr, &["tenants"]).await }
        })
        .await
        .unwrap();
    assert_eq!(children.len(), 32);
}

#[tokio::test]
async fn test_partition_end_to_end() {
    let db = MemoryDatabase::new();
    let dl = DirectoryLayer::default();

    let partition = create_or_open(&db, &dl, &["tenant"], Some(b"partition".as_slice())).await.unwrap();
    assert!(partition.is_partition());
    assert!(matches!(partition.pack(&Tuple::new()), Err(DirectoryError::CannotUsePartitionRoot)));
    let partition_prefix = partition
        .as_partition()
        .unwrap()
        .directory_layer()
        .content_subspace()
        .raw_prefix()
        .to_vec();

    let orders = create_or_open(&db, &dl, &["tenant", "orders"], None).await.unwrap();
    assert!(!orders.is_partition());
    assert_eq!(orders.path(), &["tenant".to_string(), "orders".to_string()]);
    assert!(orders.prefix().unwrap().starts_with(&partition_prefix));
    assert!(orders.prefix().unwrap().len() > partition_prefix.len());

    let key = orders.pack(&Tuple::new().push(1i64)).unwrap();
    db.transact(|tr| {
        let key = key.clone();
        async move {
            tr.set(&key, b"order");
            Ok::<_, DirectoryError>(())
        }
    })
    .await
    .unwrap();

    let listed = db
        .read_transact(|tr| {
            let dl = dl.clone();
            async move { dl.list(&tr, &["tenant"]).await }
        })
        .await
        .unwrap();
    assert_eq!(listed, vec!["orders".to_string()]);

    let err = db
        .transact(|tr| {
            let dl = dl.clone();
            async move { dl.move_directory(&tr, &["tenant", "orders"], &["orders"]).await }
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::CannotMoveBetweenPartitions));

    db.transact(|tr| {
        let dl = dl.clone();
        async move { dl.remove(&tr, &["tenant"]).await }
    })
    .await
    .unwrap();
    assert!(!exists(&db, &dl, &["tenant"]).await);
    assert!(!exists(&db, &dl, &["tenant", "orders"]).await);
    let value = db
        .read_transact(|tr| {
            let key = key.clone();
            async move { tr.get(&key, false).await }
        })
        .await
        .unwrap();
    assert_eq!(value, None);
}
