use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{Service, WashBox};
use crate::storage::Storage;

// Two boxes with two places each plus the standard service menu.
// Safe to run repeatedly, existing rows are left alone.
pub async fn seed_demo_data(storage: &dyn Storage) -> Result<()> {
    let mut boxes_created = 0;
    for box_number in [1, 2] {
        for place_number in [1, 2] {
            if storage
                .get_box_by_number(box_number, place_number)
                .await?
                .is_some()
            {
                continue;
            }
            let wash_box = WashBox {
                id: Uuid::new_v4().to_string(),
                box_number,
                place_number,
                is_active: true,
            };
            storage.save_box(&wash_box).await?;
            boxes_created += 1;
        }
    }

    let services_data: [(&str, &str, Decimal); 5] = [
        ("Body wash", "Standard exterior body wash", dec!(500.00)),
        (
            "Body wash + drying",
            "Exterior wash followed by hand drying",
            dec!(700.00),
        ),
        (
            "Interior cleaning",
            "Wet cleaning of the car interior",
            dec!(1000.00),
        ),
        (
            "Full wash package",
            "Body wash + drying + interior cleaning",
            dec!(1500.00),
        ),
        ("Body polishing", "Polishing of the car body", dec!(2000.00)),
    ];

    let mut services_created = 0;
    for (name, description, price) in services_data {
        if storage.get_service_by_name(name).await?.is_some() {
            continue;
        }
        let service = Service {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            price,
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
        };
        storage.save_service(&service).await?;
        services_created += 1;
    }

    tracing::info!(
        boxes = boxes_created,
        services = services_created,
        "seed data ready"
    );
    Ok(())
}
