//! Pagination engine
//!
//! Translates a [`PageRequest`] plus a feature's base filter into one
//! windowed read against a [`ListStore`], returning the shared page
//! envelope. The engine holds no cross-call state; concurrent calls never
//! interact.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::controller::ListClient;
use crate::domain::{ListError, ListResult, Listable};
use crate::shared::{FilterSet, PageRequest, PageResult};
use crate::store::{ListStore, OrderBy, StoreQuery};

pub struct ListEngine<S> {
    store: Arc<S>,
}

impl<S> ListEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch one page of `T` matching `base AND request.filters`.
    ///
    /// Fails with `InvalidArgument` on `page == 0`, `limit == 0`, a dangling
    /// sort half, or an unknown sort field; arguments are never corrected
    /// silently.
    pub async fn paginate<T>(
        &self,
        request: &PageRequest,
        base: &FilterSet,
        relations: &[String],
    ) -> ListResult<PageResult<T>>
    where
        T: Listable,
        S: ListStore<T>,
    {
        let order = validate::<T>(request)?;

        let query = StoreQuery {
            filters: base.merge(&request.filters),
            order,
            skip: request.skip(),
            take: u64::from(request.limit),
            relations: relations.to_vec(),
        };

        debug!(
            entity = T::entity(),
            page = request.page,
            limit = request.limit,
            filters = query.filters.len(),
            "paginating"
        );

        let (items, total) = self.store.find_and_count(&query).await?;
        Ok(PageResult::new(items, total, request.page, request.limit))
    }
}

fn validate<T: Listable>(request: &PageRequest) -> ListResult<OrderBy> {
    if request.page == 0 {
        return Err(ListError::invalid("page must be at least 1"));
    }
    if request.limit == 0 {
        return Err(ListError::invalid("limit must be at least 1"));
    }
    match (request.sort_by.as_deref(), request.sort_order) {
        (None, None) => Ok(OrderBy::LastModified),
        (Some(field), Some(order)) => {
            if T::sortable_fields().contains(&field) {
                Ok(OrderBy::Field(field.to_string(), order))
            } else {
                Err(ListError::invalid(format!(
                    "unknown sort field `{field}` for {}",
                    T::entity()
                )))
            }
        }
        (Some(_), None) => Err(ListError::invalid("sortBy requires sortOrder")),
        (None, Some(_)) => Err(ListError::invalid("sortOrder requires sortBy")),
    }
}

/// Binds an engine to one listing feature: its record type, base filter and
/// eager relations. This is the server half of the logical list endpoint;
/// controllers talk to it through [`ListClient`].
pub struct ListEndpoint<T, S> {
    engine: Arc<ListEngine<S>>,
    base: FilterSet,
    relations: Vec<String>,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> ListEndpoint<T, S> {
    pub fn new(engine: Arc<ListEngine<S>>, base: FilterSet, relations: Vec<String>) -> Self {
        Self {
            engine,
            base,
            relations,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T, S> ListClient<T> for ListEndpoint<T, S>
where
    T: Listable,
    S: ListStore<T>,
{
    async fn fetch_page(&self, request: PageRequest) -> ListResult<PageResult<T>> {
        self.engine.paginate(&request, &self.base, &self.relations).await
    }
}
