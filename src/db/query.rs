//! Declarative query descriptor.
//!
//! Services describe what they want (filters, ordering, a page window) and
//! the db layer translates that into a `Select`, so no query building leaks
//! above the repositories.

use sea_orm::sea_query::IntoCondition;
use sea_orm::{Condition, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select};

#[derive(Debug, Clone)]
pub struct FindOptions<E: EntityTrait> {
    condition: Condition,
    order: Vec<(E::Column, Order)>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl<E: EntityTrait> Default for FindOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FindOptions<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
            order: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Add a filter; multiple filters are ANDed.
    #[must_use]
    pub fn filter<C: IntoCondition>(mut self, condition: C) -> Self {
        self.condition = self.condition.add(condition.into_condition());
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order.push((column, order));
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply the descriptor to an existing select.
    #[must_use]
    pub fn apply(self, mut select: Select<E>) -> Select<E> {
        select = select.filter(self.condition);

        for (column, order) in self.order {
            select = select.order_by(column, order);
        }

        if let Some(offset) = self.offset {
            select = select.offset(offset);
        }
        if let Some(limit) = self.limit {
            select = select.limit(limit);
        }

        select
    }

    #[must_use]
    pub fn into_select(self) -> Select<E> {
        self.apply(E::find())
    }
}
