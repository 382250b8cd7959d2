#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use crate::routes::destination::schemas::CreateDestinationRequest;
    use crate::routes::destination::utils::{create_destination, hard_delete_destination};
    use crate::routes::excursion::schemas::{CreateExcursionRequest, UpdateExcursionRequest};
    use crate::routes::excursion::utils::{
        create_excursion, deactivate_excursion, fetch_bookable_excursion, fetch_excursion,
        hard_delete_excursion, update_excursion,
    };

    use crate::utils::tests::get_test_pool;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_excursion_catalog_lifecycle() {
        let pool = get_test_pool().await;
        let destination = create_destination(
            &pool,
            CreateDestinationRequest {
                name: "Catalog Test Coast".to_string(),
                country: "Spain".to_string(),
                description: "".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap();

        let excursion = create_excursion(
            &pool,
            CreateExcursionRequest {
                destination_id: destination.id,
                title: "Coastal kayak tour".to_string(),
                description: "Half-day paddle".to_string(),
                price: dec("75.50"),
                capacity: 12,
                duration_hours: Some(5),
            },
        )
        .await
        .unwrap();
        assert_eq!(excursion.destination_name, "Catalog Test Coast");
        assert_eq!(excursion.price, dec("75.50"));

        // Active excursions are bookable.
        let bookable = fetch_bookable_excursion(&pool, excursion.id).await.unwrap();
        assert!(bookable.is_some());

        let updated = update_excursion(
            &pool,
            excursion.id,
            UpdateExcursionRequest {
                title: None,
                description: None,
                price: Some(dec("82.00")),
                capacity: None,
                duration_hours: None,
                is_active: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, dec("82.00"));
        assert_eq!(updated.title, "Coastal kayak tour");

        // Deactivation removes the excursion from the bookable set but keeps
        // the row.
        deactivate_excursion(&pool, excursion.id).await.unwrap();
        let bookable = fetch_bookable_excursion(&pool, excursion.id).await.unwrap();
        assert!(bookable.is_none());
        let fetched = fetch_excursion(&pool, excursion.id).await.unwrap();
        assert!(fetched.is_some());

        hard_delete_excursion(&pool, excursion.id).await.unwrap();
        hard_delete_destination(&pool, destination.id).await.unwrap();
    }
}
