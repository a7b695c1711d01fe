use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::order::{Order, OrderStatus, UNSPECIFIED_LOCATION};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AggregatedItem {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationGroup {
    pub location: String,
    pub items: Vec<AggregatedItem>,
}

/// Shopping manifest for a driver's accepted orders: items grouped by pickup
/// location, quantities summed per item name. Derived fresh on every call,
/// never stored.
pub fn aggregate_items(orders: &[Order], range: Option<(NaiveDate, NaiveDate)>) -> Vec<LocationGroup> {
    let mut by_location: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

    for order in orders {
        if order.status != OrderStatus::Accepted {
            continue;
        }
        if let Some((start, end)) = range {
            let created = order.created_at.date_naive();
            if created < start || created > end {
                continue;
            }
        }

        for item in &order.items {
            let location = item
                .location
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string());
            *by_location
                .entry(location)
                .or_default()
                .entry(item.name.clone())
                .or_insert(0) += item.quantity;
        }
    }

    by_location
        .into_iter()
        .map(|(location, items)| LocationGroup {
            location,
            items: items
                .into_iter()
                .map(|(name, quantity)| AggregatedItem { name, quantity })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::{aggregate_items, AggregatedItem};
    use crate::models::order::{Order, OrderItem, OrderStatus, Service, UNSPECIFIED_LOCATION};

    fn accepted_order(seed: u128, items: Vec<OrderItem>) -> Order {
        Order {
            id: Uuid::from_u128(seed),
            buyer_id: Uuid::new_v4(),
            buyer_name: "buyer".to_string(),
            buyer_phone: "0911222333".to_string(),
            total_price: items.iter().map(|i| i.price * i.quantity as f64).sum(),
            items,
            location: "village hall".to_string(),
            is_urgent: false,
            deadline_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            deadline_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            note: None,
            service: Service::Necessities,
            status: OrderStatus::Accepted,
            assigned_driver: Some(Uuid::from_u128(9)),
            previous_driver: None,
            actions: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn item(name: &str, quantity: u32, location: Option<&str>) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            quantity,
            price: 30.0,
            location: location.map(str::to_string),
            category: None,
        }
    }

    #[test]
    fn same_item_at_same_location_sums_across_orders() {
        let a = accepted_order(1, vec![item("milk", 2, Some("supermarket"))]);
        let b = accepted_order(2, vec![item("milk", 3, Some("supermarket"))]);

        let groups = aggregate_items(&[a, b], None);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].location, "supermarket");
        assert_eq!(
            groups[0].items,
            vec![AggregatedItem {
                name: "milk".to_string(),
                quantity: 5
            }]
        );
    }

    #[test]
    fn missing_location_falls_into_unspecified_bucket() {
        let a = accepted_order(1, vec![item("eggs", 1, None)]);

        let groups = aggregate_items(&[a], None);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].location, UNSPECIFIED_LOCATION);
    }

    #[test]
    fn non_accepted_orders_are_excluded() {
        let mut done = accepted_order(1, vec![item("milk", 2, Some("supermarket"))]);
        done.status = OrderStatus::Completed;

        let groups = aggregate_items(&[done], None);

        assert!(groups.is_empty());
    }

    #[test]
    fn locations_partition_the_manifest() {
        let a = accepted_order(
            1,
            vec![
                item("milk", 2, Some("supermarket")),
                item("feed", 1, Some("farm co-op")),
            ],
        );

        let groups = aggregate_items(&[a], None);

        assert_eq!(groups.len(), 2);
        let locations: Vec<&str> = groups.iter().map(|g| g.location.as_str()).collect();
        assert!(locations.contains(&"supermarket"));
        assert!(locations.contains(&"farm co-op"));
    }
}
