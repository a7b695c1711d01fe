use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};

/// Tie-break policy for the unaccepted queue. Urgent orders always come
/// first; `UrgencyLocation` additionally breaks ties by pickup location so
/// nearby orders cluster together in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnacceptedSort {
    Urgency,
    UrgencyLocation,
}

/// One page of a queue. Page indexes are 1-based; a page past the end is
/// empty rather than an error.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);

    let items = if start >= total {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(start)
            .take(page_size)
            .collect()
    };

    Page {
        items,
        page,
        page_size,
        total,
    }
}

/// Queue of orders still up for grabs, urgent first.
pub fn unaccepted_queue(mut orders: Vec<Order>, sort: UnacceptedSort) -> Vec<Order> {
    orders.retain(|order| order.status == OrderStatus::Unaccepted);

    match sort {
        UnacceptedSort::Urgency => {
            orders.sort_by_key(|order| !order.is_urgent);
        }
        UnacceptedSort::UrgencyLocation => {
            orders.sort_by(|a, b| {
                b.is_urgent
                    .cmp(&a.is_urgent)
                    .then_with(|| a.location.cmp(&b.location))
            });
        }
    }

    orders
}

/// Orders the driver currently holds, optionally restricted to an inclusive
/// creation-date range.
pub fn accepted_queue(
    mut orders: Vec<Order>,
    driver_id: Uuid,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Vec<Order> {
    orders.retain(|order| {
        order.status == OrderStatus::Accepted
            && order.assigned_driver == Some(driver_id)
            && in_range(order, range)
    });
    orders
}

/// Orders the driver finished, most recent first.
pub fn completed_queue(mut orders: Vec<Order>, driver_id: Uuid) -> Vec<Order> {
    orders.retain(|order| {
        order.status == OrderStatus::Completed && order.assigned_driver == Some(driver_id)
    });
    orders.sort_by(|a, b| {
        let a_at = a.completed_at.unwrap_or(a.created_at);
        let b_at = b.completed_at.unwrap_or(b.created_at);
        b_at.cmp(&a_at)
    });
    orders
}

fn in_range(order: &Order, range: Option<(NaiveDate, NaiveDate)>) -> bool {
    match range {
        Some((start, end)) => {
            let created = order.created_at.date_naive();
            created >= start && created <= end
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::{accepted_queue, completed_queue, paginate, unaccepted_queue, UnacceptedSort};
    use crate::models::order::{Order, OrderItem, OrderStatus, Service};

    fn order(seed: u128, urgent: bool, location: &str, status: OrderStatus) -> Order {
        Order {
            id: Uuid::from_u128(seed),
            buyer_id: Uuid::new_v4(),
            buyer_name: "buyer".to_string(),
            buyer_phone: "0911222333".to_string(),
            items: vec![OrderItem {
                name: "rice".to_string(),
                quantity: 1,
                price: 50.0,
                location: None,
                category: None,
            }],
            total_price: 50.0,
            location: location.to_string(),
            is_urgent: urgent,
            deadline_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            deadline_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            note: None,
            service: Service::Necessities,
            status,
            assigned_driver: None,
            previous_driver: None,
            actions: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn urgent_orders_always_lead_the_unaccepted_queue() {
        let a = order(1, true, "X", OrderStatus::Unaccepted);
        let b = order(2, false, "A", OrderStatus::Unaccepted);
        let c = order(3, true, "B", OrderStatus::Unaccepted);

        let queue = unaccepted_queue(vec![a, b, c], UnacceptedSort::Urgency);

        assert!(queue[0].is_urgent);
        assert!(queue[1].is_urgent);
        assert_eq!(queue[2].id, Uuid::from_u128(2));
    }

    #[test]
    fn location_variant_breaks_urgency_ties_lexicographically() {
        let a = order(1, true, "X", OrderStatus::Unaccepted);
        let b = order(2, false, "A", OrderStatus::Unaccepted);
        let c = order(3, true, "B", OrderStatus::Unaccepted);

        let queue = unaccepted_queue(vec![a, b, c], UnacceptedSort::UrgencyLocation);

        let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
        assert_eq!(
            ids,
            vec![Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)]
        );
    }

    #[test]
    fn accepted_and_completed_orders_never_appear_unaccepted() {
        let mut a = order(1, false, "X", OrderStatus::Accepted);
        a.assigned_driver = Some(Uuid::from_u128(9));
        let b = order(2, false, "A", OrderStatus::Unaccepted);

        let queue = unaccepted_queue(vec![a, b], UnacceptedSort::Urgency);

        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, Uuid::from_u128(2));
    }

    #[test]
    fn accepted_queue_is_scoped_to_driver_and_date_range() {
        let driver = Uuid::from_u128(9);
        let other = Uuid::from_u128(8);

        let mut mine_recent = order(1, false, "X", OrderStatus::Accepted);
        mine_recent.assigned_driver = Some(driver);
        let mut mine_old = order(2, false, "X", OrderStatus::Accepted);
        mine_old.assigned_driver = Some(driver);
        mine_old.created_at = Utc::now() - Duration::days(30);
        let mut theirs = order(3, false, "X", OrderStatus::Accepted);
        theirs.assigned_driver = Some(other);

        let today = Utc::now().date_naive();
        let queue = accepted_queue(
            vec![mine_recent, mine_old, theirs],
            driver,
            Some((today - Duration::days(7), today)),
        );

        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, Uuid::from_u128(1));
    }

    #[test]
    fn completed_queue_is_most_recent_first() {
        let driver = Uuid::from_u128(9);

        let mut older = order(1, false, "X", OrderStatus::Completed);
        older.assigned_driver = Some(driver);
        older.completed_at = Some(Utc::now() - Duration::hours(2));
        let mut newer = order(2, false, "X", OrderStatus::Completed);
        newer.assigned_driver = Some(driver);
        newer.completed_at = Some(Utc::now());

        let queue = completed_queue(vec![older, newer], driver);

        assert_eq!(queue[0].id, Uuid::from_u128(2));
        assert_eq!(queue[1].id, Uuid::from_u128(1));
    }

    #[test]
    fn pagination_is_one_based_and_tolerates_overflow() {
        let items: Vec<u32> = (0..7).collect();

        let first = paginate(items.clone(), 1, 3);
        assert_eq!(first.items, vec![0, 1, 2]);
        assert_eq!(first.total, 7);

        let last = paginate(items.clone(), 3, 3);
        assert_eq!(last.items, vec![6]);

        let past_end = paginate(items, 4, 3);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 7);
    }
}
