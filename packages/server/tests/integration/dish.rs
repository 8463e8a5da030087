use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::{dish, dish_genre, dish_ingredient, ingredient};

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn create_then_read_back_round_trips() {
        let app = TestApp::spawn().await;
        let onion = app.create_ingredient("玉ねぎ", 3).await;
        let pork = app.create_ingredient("豚肉", 1).await;

        let res = app
            .post_json(
                routes::DISH_NEW,
                &json!({
                    "name": "肉じゃが",
                    "genre_ids": [1, 2],
                    "ingredient_ids": format!("{onion},{pork}"),
                    "difficulty": 3,
                    "memo": "test",
                }),
            )
            .await;
        assert_eq!(res.status, 303, "create failed: {}", res.text);
        assert_eq!(res.location.as_deref(), Some("/edit"));

        let id = dish::Entity::find()
            .filter(dish::Column::Name.eq("肉じゃが"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap()
            .id;

        let res = app.get(&routes::dish(id)).await;
        assert_eq!(res.status, 200);
        let d = &res.body["dish"];
        assert_eq!(d["name"], "肉じゃが");
        assert_eq!(d["difficulty"], 3);
        assert_eq!(d["memo"], "test");

        let mut genre_ids: Vec<i64> = d["genres"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["id"].as_i64().unwrap())
            .collect();
        genre_ids.sort_unstable();
        assert_eq!(genre_ids, vec![1, 2]);

        let mut ingredient_ids: Vec<i64> = d["ingredients"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_i64().unwrap())
            .collect();
        ingredient_ids.sort_unstable();
        let mut expected = vec![onion as i64, pork as i64];
        expected.sort_unstable();
        assert_eq!(ingredient_ids, expected);
    }

    #[tokio::test]
    async fn unknown_and_junk_ingredient_tokens_are_skipped() {
        let app = TestApp::spawn().await;
        let onion = app.create_ingredient("玉ねぎ", 3).await;

        let res = app
            .post_json(
                routes::DISH_NEW,
                &json!({
                    "name": "スープ",
                    "genre_ids": [7],
                    "ingredient_ids": format!("{onion},junk,9999"),
                    "difficulty": 1,
                }),
            )
            .await;
        assert_eq!(res.status, 303, "create failed: {}", res.text);

        let id = app
            .get(routes::EDIT_PAGE)
            .await
            .body["dishes"][0]["id"]
            .as_i64()
            .unwrap() as i32;
        let edges = dish_ingredient::Entity::find()
            .filter(dish_ingredient::Column::DishId.eq(id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].ingredient_id, onion);
    }

    #[tokio::test]
    async fn blank_form_has_defaults_and_reference_lists() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::DISH_NEW).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["dish_id"], serde_json::Value::Null);
        assert_eq!(res.body["values"]["difficulty"], 1);
        assert!(res.error_fields().is_empty());
        assert_eq!(res.body["genres"].as_array().unwrap().len(), 8);
        assert_eq!(res.body["categories"].as_array().unwrap().len(), 5);
    }
}

mod validation {
    use super::*;

    async fn assert_rejected(app: &TestApp, payload: serde_json::Value, field: &str) {
        let res = app.post_json(routes::DISH_NEW, &payload).await;
        assert_eq!(res.status, 200, "expected re-rendered form: {}", res.text);
        assert!(
            res.error_fields().iter().any(|f| f == field),
            "expected error on '{field}', got: {}",
            res.text
        );
        let count = dish::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0, "no dish row may be created on a failed submission");
    }

    #[tokio::test]
    async fn too_many_genres_is_a_field_error() {
        let app = TestApp::spawn().await;
        assert_rejected(
            &app,
            json!({"name": "test", "genre_ids": [1, 2, 3], "difficulty": 1}),
            "genre_ids",
        )
        .await;
    }

    #[tokio::test]
    async fn difficulty_out_of_range_is_a_field_error() {
        let app = TestApp::spawn().await;
        for difficulty in [0, 6] {
            assert_rejected(
                &app,
                json!({"name": "test", "difficulty": difficulty}),
                "difficulty",
            )
            .await;
        }
    }

    #[tokio::test]
    async fn empty_name_is_a_field_error() {
        let app = TestApp::spawn().await;
        assert_rejected(&app, json!({"name": "", "difficulty": 1}), "name").await;
    }

    #[tokio::test]
    async fn overlong_memo_is_a_field_error() {
        let app = TestApp::spawn().await;
        assert_rejected(
            &app,
            json!({"name": "test", "difficulty": 1, "memo": "め".repeat(501)}),
            "memo",
        )
        .await;
    }

    #[tokio::test]
    async fn failed_submission_echoes_the_input() {
        let app = TestApp::spawn().await;
        let res = app
            .post_json(
                routes::DISH_NEW,
                &json!({"name": "カレー", "genre_ids": [1, 2, 3], "ingredient_ids": "1,2", "difficulty": 2}),
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["values"]["name"], "カレー");
        assert_eq!(res.body["values"]["ingredient_ids"], "1,2");
        assert_eq!(res.body["values"]["difficulty"], 2);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_with_400() {
        let app = TestApp::spawn().await;
        let res = app
            .post_json(routes::DISH_NEW, &json!({"name": "test", "difficulty": "hard"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod editing {
    use super::*;

    #[tokio::test]
    async fn edit_form_is_prefilled_from_the_dish() {
        let app = TestApp::spawn().await;
        let onion = app.create_ingredient("玉ねぎ", 3).await;
        let carrot = app.create_ingredient("にんじん", 3).await;
        let id = app.create_dish("カレー", &[1], &[onion, carrot], 2).await;

        let res = app
            .get(&format!("{}?referrer=/edit", routes::dish_edit(id)))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["dish_id"], id);
        assert_eq!(res.body["values"]["name"], "カレー");
        assert_eq!(res.body["values"]["genre_ids"], json!([1]));
        assert_eq!(
            res.body["values"]["ingredient_ids"],
            format!("{onion},{carrot}")
        );
        assert_eq!(res.body["values"]["referrer"], "/edit");
    }

    #[tokio::test]
    async fn full_replace_leaves_no_stale_memberships() {
        let app = TestApp::spawn().await;
        let onion = app.create_ingredient("玉ねぎ", 3).await;
        let carrot = app.create_ingredient("にんじん", 3).await;
        let id = app.create_dish("カレー", &[1, 2], &[onion, carrot], 3).await;

        let res = app
            .post_json(
                &routes::dish_edit(id),
                &json!({
                    "name": "ビーフカレー",
                    "genre_ids": [4],
                    "ingredient_ids": onion.to_string(),
                    "difficulty": 4,
                    "memo": "updated",
                }),
            )
            .await;
        assert_eq!(res.status, 303, "update failed: {}", res.text);

        let genre_edges = dish_genre::Entity::find()
            .filter(dish_genre::Column::DishId.eq(id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(genre_edges.len(), 1);
        assert_eq!(genre_edges[0].genre_id, 4);

        let ingredient_edges = dish_ingredient::Entity::find()
            .filter(dish_ingredient::Column::DishId.eq(id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(ingredient_edges.len(), 1);
        assert_eq!(ingredient_edges[0].ingredient_id, onion);

        let model = dish::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(model.name, "ビーフカレー");
        assert_eq!(model.difficulty, 4);
        assert_eq!(model.memo.as_deref(), Some("updated"));
        assert!(model.updated_at > model.created_at);
    }

    #[tokio::test]
    async fn update_redirects_back_to_the_detail_page() {
        let app = TestApp::spawn().await;
        let id = app.create_dish("カレー", &[1], &[], 2).await;

        let res = app
            .post_json(
                &routes::dish_edit(id),
                &json!({
                    "name": "カレー",
                    "difficulty": 2,
                    "referrer": format!("/dish/{id}"),
                }),
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(routes::dish(id).as_str()));
    }

    #[tokio::test]
    async fn update_redirects_to_the_referrer_otherwise() {
        let app = TestApp::spawn().await;
        let id = app.create_dish("カレー", &[1], &[], 2).await;

        let res = app
            .post_json(
                &routes::dish_edit(id),
                &json!({"name": "カレー", "difficulty": 2, "referrer": "/search?genre_ids=1"}),
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/search?genre_ids=1"));

        let res = app
            .post_json(
                &routes::dish_edit(id),
                &json!({"name": "カレー", "difficulty": 2}),
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/edit"));
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let app = TestApp::spawn().await;
        let id = app.create_dish("カレー", &[1], &[], 2).await;

        let res = app
            .post_json(
                &routes::dish_edit(id),
                &json!({"name": "", "difficulty": 9}),
            )
            .await;
        assert_eq!(res.status, 200);
        let fields = res.error_fields();
        assert!(fields.iter().any(|f| f == "name"));
        assert!(fields.iter().any(|f| f == "difficulty"));

        let model = dish::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(model.name, "カレー");
        assert_eq!(model.difficulty, 2);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_the_dish_and_its_memberships_only() {
        let app = TestApp::spawn().await;
        let onion = app.create_ingredient("玉ねぎ", 3).await;
        let id = app.create_dish("カレー", &[1], &[onion], 2).await;

        let res = app.post_empty(&routes::dish_delete(id)).await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/edit"));

        assert!(dish::Entity::find_by_id(id).one(&app.db).await.unwrap().is_none());
        let edges = dish_ingredient::Entity::find()
            .filter(dish_ingredient::Column::DishId.eq(id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(edges, 0);

        // The ingredient itself survives.
        assert!(
            ingredient::Entity::find_by_id(onion)
                .one(&app.db)
                .await
                .unwrap()
                .is_some()
        );
    }
}

mod missing {
    use super::*;

    #[tokio::test]
    async fn unknown_dish_ids_return_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::dish(42)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get(&routes::dish_edit(42)).await;
        assert_eq!(res.status, 404);

        let res = app
            .post_json(&routes::dish_edit(42), &json!({"name": "x", "difficulty": 1}))
            .await;
        assert_eq!(res.status, 404);

        let res = app.post_empty(&routes::dish_delete(42)).await;
        assert_eq!(res.status, 404);
    }
}
