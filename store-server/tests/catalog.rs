//! 目录资源集成测试：系列、轮播图、整套搭配

use store_server::db::models::{CollectionCreate, CollectionUpdate, LookCreate, ProductCreate, SliderCreate};
use store_server::db::repository::{
    CollectionRepository, LookRepository, ProductRepository, RepoError, SliderRepository,
};
use store_server::{Config, ServerState};

async fn test_state() -> (tempfile::TempDir, ServerState) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await;
    (tmp, state)
}

fn product(name: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: None,
        price: 20.0,
        stock: 5,
        category: "tops".to_string(),
        brand: "Vitrina".to_string(),
        sizes: None,
        images: None,
        is_featured: None,
    }
}

#[tokio::test]
async fn duplicate_collection_title_is_rejected() {
    let (_tmp, state) = test_state().await;
    let repo = CollectionRepository::new(state.db.clone());

    let create = CollectionCreate {
        title: "Summer 2026".to_string(),
        description: None,
        image: None,
        category: "summer".to_string(),
        sort_order: Some(1),
    };
    repo.create(create.clone()).await.unwrap();

    let err = repo.create(create).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn collection_update_merges_partial_fields() {
    let (_tmp, state) = test_state().await;
    let repo = CollectionRepository::new(state.db.clone());

    let created = repo
        .create(CollectionCreate {
            title: "Evening wear".to_string(),
            description: Some("Gowns and sets".to_string()),
            image: None,
            category: "evening".to_string(),
            sort_order: Some(2),
        })
        .await
        .unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let updated = repo
        .update(
            &id,
            CollectionUpdate {
                title: None,
                description: None,
                image: Some("/uploads/evening.jpg".to_string()),
                category: None,
                sort_order: None,
                is_active: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Evening wear");
    assert_eq!(updated.description, "Gowns and sets");
    assert_eq!(updated.image, "/uploads/evening.jpg");
}

#[tokio::test]
async fn sliders_list_in_sort_order() {
    let (_tmp, state) = test_state().await;
    let repo = SliderRepository::new(state.db.clone());

    for (title, sort_order) in [("Second", 2), ("First", 1), ("Third", 3)] {
        repo.create(SliderCreate {
            title: title.to_string(),
            subtitle: None,
            image: format!("/uploads/{title}.jpg"),
            link: None,
            sort_order: Some(sort_order),
        })
        .await
        .unwrap();
    }

    let slides = repo.find_all().await.unwrap();
    let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn look_full_skips_dangling_product_references() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let looks = LookRepository::new(state.db.clone());

    let keep = products.create(product("Top")).await.unwrap();
    let gone = products.create(product("Bottom")).await.unwrap();
    let keep_id = keep.id.as_ref().unwrap().to_string();
    let gone_id = gone.id.as_ref().unwrap().to_string();

    let look = looks
        .create(LookCreate {
            name: "Office look".to_string(),
            image: Some("/uploads/office.jpg".to_string()),
            products: vec![keep_id.clone(), gone_id.clone()],
        })
        .await
        .unwrap();
    let look_id = look.id.as_ref().unwrap().to_string();

    products.delete(&gone_id).await.unwrap();

    let look = looks.find_by_id(&look_id).await.unwrap().unwrap();
    let resolved = products.find_by_record_ids(&look.products).await.unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "Top");
}

#[tokio::test]
async fn empty_look_is_rejected() {
    let (_tmp, state) = test_state().await;
    let looks = LookRepository::new(state.db.clone());

    let err = looks
        .create(LookCreate {
            name: "Empty".to_string(),
            image: None,
            products: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
