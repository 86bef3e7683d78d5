use std::sync::Arc;

use crate::{
    domain::event::EventRepository,
    workflow::events::{
        create::{CreateEventUseCase, CreateEventUseCaseImpl},
        get::{GetEventUseCase, GetEventUseCaseImpl},
        list::{ListEventsUseCase, ListEventsUseCaseImpl},
    },
};

pub mod domain;
pub mod workflow;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub struct Application {
    pub event_list_use_case: Box<dyn ListEventsUseCase + Send + Sync + 'static>,
    pub event_get_use_case: Box<dyn GetEventUseCase + Send + Sync + 'static>,
    pub event_create_use_case: Box<dyn CreateEventUseCase + Send + Sync + 'static>,
}

pub fn build_application<ER: EventRepository + Send + Sync + 'static>(
    event_repository: Arc<ER>,
) -> Application {
    let event_list_use_case = Box::new(ListEventsUseCaseImpl::new(event_repository.clone()));
    let event_get_use_case = Box::new(GetEventUseCaseImpl::new(event_repository.clone()));
    let event_create_use_case = Box::new(CreateEventUseCaseImpl::new(event_repository));

    Application {
        event_list_use_case,
        event_get_use_case,
        event_create_use_case,
    }
}
