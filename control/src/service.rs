use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use futures::{
    channel::{mpsc, oneshot},
    future, StreamExt,
};
use schema::{
    Aircraft, AircraftSpecification, BootStatusProvider, Dispatch, Enqueued, Operation,
    PriorityQueue, QueueError, TimeAdded,
};
use tokio::time::Instant;
use ulid::Ulid;

use crate::{ServiceConfig, SortedQueue};

pub type Response<T> = Pin<Box<dyn Future<Output = Result<T, QueueError>> + Send>>;
type SharedQueue<Q> = Arc<Mutex<Q>>;

enum Request {
    Enqueue {
        item: Aircraft,
        respond_to: oneshot::Sender<Result<Enqueued, QueueError>>,
    },
    Dequeue {
        respond_to: oneshot::Sender<Result<Aircraft, QueueError>>,
    },
}

fn lock<Q>(queue: &SharedQueue<Q>) -> MutexGuard<'_, Q> {
    // insert/remove never leave the queue half-updated
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Caller-facing handle to the intake queue.
///
/// Requests are checked against the boot flag when they are made, then
/// handed to the paired [`Dispatcher`], which applies them strictly in the
/// order they were issued.
pub struct QueueService<B, Q = SortedQueue> {
    boot: Arc<B>,
    queue: SharedQueue<Q>,
    requests: mpsc::UnboundedSender<(Ulid, Request)>,
    clock: IntakeClock,
}

impl<B, Q> QueueService<B, Q>
where
    B: BootStatusProvider,
    Q: PriorityQueue + Default + Send + 'static,
{
    /// Create a service around an empty queue, along with the `Dispatcher`
    /// which must be driven for any request to complete
    pub fn new(boot: Arc<B>, config: &ServiceConfig) -> (Self, Dispatcher<Q>) {
        Self::with_queue(boot, Q::default(), config.adjusted_processing_delay())
    }
}

impl<B, Q> QueueService<B, Q>
where
    B: BootStatusProvider,
    Q: PriorityQueue + Send + 'static,
{
    pub fn with_queue(boot: Arc<B>, queue: Q, processing_delay: Duration) -> (Self, Dispatcher<Q>) {
        let queue = Arc::new(Mutex::new(queue));
        let (tx, rx) = mpsc::unbounded();

        let service = Self {
            boot,
            queue: queue.clone(),
            requests: tx,
            clock: IntakeClock::new(),
        };
        let dispatcher = Dispatcher {
            queue,
            requests: rx,
            processing_delay,
        };

        (service, dispatcher)
    }

    /// Number of aircraft currently queued
    pub fn size(&self) -> usize {
        lock(&self.queue).size()
    }

    /// Copy of the queue from front to back
    pub fn snapshot(&self) -> Vec<Aircraft> {
        lock(&self.queue).items().cloned().collect()
    }

    /// Validate an operator's aircraft specification, stamp it with its
    /// arrival time and enqueue it
    pub fn admit(&self, specification: AircraftSpecification) -> Response<Enqueued> {
        if let Err(e) = self.check_booted(Operation::Enqueue) {
            return Box::pin(future::ready(Err(e)));
        }

        match specification.into_aircraft(self.clock.stamp()) {
            Ok(item) => self.submit_enqueue(item),
            Err(e) => {
                log::warn!("rejecting aircraft specification: {}", e);
                Box::pin(future::ready(Err(e)))
            }
        }
    }

    /// Rejections happen here, before anything is handed to the dispatcher
    fn check_booted(&self, operation: Operation) -> Result<(), QueueError> {
        if self.boot.is_booted() {
            return Ok(());
        }

        self.boot.handle_unbooted_access();
        log::warn!("rejecting {}: system is not booted", operation);

        Err(QueueError::SystemNotBooted(operation))
    }

    fn submit_enqueue(&self, item: Aircraft) -> Response<Enqueued> {
        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Enqueue { item, respond_to }, response)
    }

    fn submit<T: Send + 'static>(
        &self,
        request: Request,
        response: oneshot::Receiver<Result<T, QueueError>>,
    ) -> Response<T> {
        let id = Ulid::new();
        if self.requests.unbounded_send((id, request)).is_err() {
            log::warn!("dropping request {}: dispatcher is not running", id);
            return Box::pin(future::ready(Err(QueueError::DispatcherClosed)));
        }
        log::debug!("submitted request {}", id);

        Box::pin(async move { response.await.unwrap_or(Err(QueueError::DispatcherClosed)) })
    }
}

impl<B, Q> Dispatch for QueueService<B, Q>
where
    B: BootStatusProvider,
    Q: PriorityQueue + Send + 'static,
{
    type Enqueue = Response<Enqueued>;
    type Dequeue = Response<Aircraft>;

    fn enqueue(&self, item: Aircraft) -> Self::Enqueue {
        if let Err(e) = self.check_booted(Operation::Enqueue) {
            return Box::pin(future::ready(Err(e)));
        }

        self.submit_enqueue(item)
    }

    fn dequeue(&self) -> Self::Dequeue {
        if let Err(e) = self.check_booted(Operation::Dequeue) {
            return Box::pin(future::ready(Err(e)));
        }

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Dequeue { respond_to }, response)
    }
}

/// Applies queued requests one at a time, in issue order, each after the
/// simulated processing delay. Runs until every `QueueService` handle is dropped.
///
/// Emptiness is judged here, when a dequeue is processed, not when it was
/// issued: a dequeue sees every enqueue issued before it, and fails with
/// `EmptyQueue` only if nothing is queued by the time its turn comes.
pub struct Dispatcher<Q = SortedQueue> {
    queue: SharedQueue<Q>,
    requests: mpsc::UnboundedReceiver<(Ulid, Request)>,
    processing_delay: Duration,
}

impl<Q: PriorityQueue> Dispatcher<Q> {
    pub async fn run(mut self) {
        log::info!("queue dispatcher running");

        while let Some((id, request)) = self.requests.next().await {
            tokio::time::sleep(self.processing_delay).await;

            let delivered = match request {
                Request::Enqueue { item, respond_to } => {
                    respond_to.send(Ok(self.apply_enqueue(id, item))).is_ok()
                }
                Request::Dequeue { respond_to } => {
                    respond_to.send(self.apply_dequeue(id)).is_ok()
                }
            };

            if !delivered {
                log::debug!("request {} completed after its caller went away", id);
            }
        }

        log::info!("queue dispatcher stopped");
    }

    fn apply_enqueue(&self, id: Ulid, item: Aircraft) -> Enqueued {
        let mut queue = lock(&self.queue);
        let position = queue.insert(item.clone());
        let total_size = queue.size();
        log::info!(
            "request {}: enqueued {} at position {} of {}",
            id,
            item,
            position + 1,
            total_size
        );

        Enqueued {
            added_at_position: position + 1,
            total_size,
            enqueued_item: item,
        }
    }

    fn apply_dequeue(&self, id: Ulid) -> Result<Aircraft, QueueError> {
        let mut queue = lock(&self.queue);
        match queue.remove_highest() {
            Some(item) => {
                log::info!("request {}: dequeued {}, {} remaining", id, item, queue.size());
                Ok(item)
            }
            None => {
                log::warn!("request {}: dequeue from an empty queue", id);
                Err(QueueError::EmptyQueue)
            }
        }
    }
}

/// Hands out strictly increasing arrival times, in milliseconds since the
/// service was created
struct IntakeClock {
    started: Instant,
    next: AtomicU64,
}

impl IntakeClock {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            next: AtomicU64::new(0),
        }
    }

    fn stamp(&self) -> TimeAdded {
        let now = self.started.elapsed().as_millis() as u64;
        let previous = match self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                Some(next.max(now) + 1)
            }) {
            Ok(next) | Err(next) => next,
        };

        TimeAdded(previous.max(now))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::SystemBootService;
    use schema::{AircraftSize, AircraftType};

    const DELAY: Duration = Duration::from_millis(100);

    fn aircraft(aircraft_type: AircraftType, size: AircraftSize, t: u64) -> Aircraft {
        Aircraft::new(aircraft_type, size, TimeAdded(t))
    }

    fn service(boot: &Arc<SystemBootService>) -> QueueService<SystemBootService> {
        let (service, dispatcher) =
            QueueService::with_queue(boot.clone(), SortedQueue::new(), DELAY);
        tokio::spawn(dispatcher.run());
        service
    }

    async fn booted() -> Arc<SystemBootService> {
        let boot = Arc::new(SystemBootService::new(Duration::from_millis(50)));
        boot.boot().await;
        boot
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_requires_boot() {
        let boot = Arc::new(SystemBootService::new(Duration::from_millis(50)));
        let service = service(&boot);

        let result = service
            .enqueue(aircraft(AircraftType::Cargo, AircraftSize::Small, 1))
            .await;
        assert!(matches!(
            result,
            Err(QueueError::SystemNotBooted(Operation::Enqueue))
        ));
        assert_eq!(boot.unbooted_access_attempts(), 1);

        // rejected requests never reach the queue
        tokio::time::sleep(DELAY * 3).await;
        assert_eq!(service.size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dequeue_requires_boot() {
        let boot = Arc::new(SystemBootService::new(Duration::from_millis(50)));
        let service = service(&boot);

        assert!(matches!(
            service.dequeue().await,
            Err(QueueError::SystemNotBooted(Operation::Dequeue))
        ));
        assert_eq!(boot.unbooted_access_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dequeue_from_empty_queue() {
        let boot = booted().await;
        let service = service(&boot);

        assert!(matches!(service.dequeue().await, Err(QueueError::EmptyQueue)));
        assert_eq!(boot.unbooted_access_attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_reports_position() -> Result<(), QueueError> {
        let boot = booted().await;
        let service = service(&boot);

        let cargo = aircraft(AircraftType::Cargo, AircraftSize::Small, 1);
        let first = service.enqueue(cargo.clone()).await?;
        assert_eq!(
            first,
            Enqueued {
                added_at_position: 1,
                total_size: 1,
                enqueued_item: cargo.clone(),
            }
        );

        let large = aircraft(AircraftType::Passenger, AircraftSize::Large, 2);
        let second = service.enqueue(large.clone()).await?;
        assert_eq!((second.added_at_position, second.total_size), (1, 2));

        let small = aircraft(AircraftType::Passenger, AircraftSize::Small, 3);
        let third = service.enqueue(small.clone()).await?;
        assert_eq!((third.added_at_position, third.total_size), (2, 3));

        assert_eq!(service.snapshot(), vec![large.clone(), small, cargo]);
        assert_eq!(service.dequeue().await?, large);
        assert_eq!(service.size(), 2);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_is_delayed() -> Result<(), QueueError> {
        let boot = booted().await;
        let service = service(&boot);

        let started = Instant::now();
        let pending = service.enqueue(aircraft(AircraftType::Cargo, AircraftSize::Large, 1));
        assert_eq!(service.size(), 0);

        pending.await?;
        assert!(started.elapsed() >= DELAY);
        assert_eq!(service.size(), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_complete_in_issue_order() {
        let boot = booted().await;
        let service = service(&boot);

        let cargo = aircraft(AircraftType::Cargo, AircraftSize::Small, 1);
        let passenger = aircraft(AircraftType::Passenger, AircraftSize::Small, 2);

        // all issued before any is processed
        let (a, b, first, second, third) = futures::join!(
            service.enqueue(cargo.clone()),
            service.enqueue(passenger.clone()),
            service.dequeue(),
            service.dequeue(),
            service.dequeue(),
        );

        assert_eq!(a.map(|e| e.added_at_position).ok(), Some(1));
        assert_eq!(b.map(|e| e.added_at_position).ok(), Some(1));
        assert_eq!(first.ok(), Some(passenger));
        assert_eq!(second.ok(), Some(cargo));
        assert!(matches!(third, Err(QueueError::EmptyQueue)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_stamps_arrival_time() -> Result<(), QueueError> {
        let boot = booted().await;
        let service = service(&boot);

        let first = service
            .admit(AircraftSpecification::new("Cargo", "Small"))
            .await?;
        let second = service
            .admit(AircraftSpecification::new("Cargo", "Small"))
            .await?;

        assert!(first.enqueued_item.time_added() < second.enqueued_item.time_added());
        assert_eq!(second.added_at_position, 2);

        let third = service
            .admit(AircraftSpecification::new("Passenger", "Small"))
            .await?;
        assert_eq!((third.added_at_position, third.total_size), (1, 3));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_rejects_invalid_specifications() {
        let boot = booted().await;
        let service = service(&boot);

        assert!(matches!(
            service
                .admit(AircraftSpecification::new("Passanger", "Large"))
                .await,
            Err(QueueError::InvalidAircraftType(_))
        ));
        assert!(matches!(
            service
                .admit(AircraftSpecification::new("Cargo", "Huge"))
                .await,
            Err(QueueError::InvalidAircraftSize(_))
        ));
        assert!(matches!(
            service.admit(AircraftSpecification::default()).await,
            Err(QueueError::InvalidArgument(_))
        ));
        assert_eq!(service.size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_requires_boot() {
        let boot = Arc::new(SystemBootService::new(Duration::from_millis(50)));
        let service = service(&boot);

        assert!(matches!(
            service
                .admit(AircraftSpecification::new("Passenger", "Large"))
                .await,
            Err(QueueError::SystemNotBooted(Operation::Enqueue))
        ));
        assert_eq!(boot.unbooted_access_attempts(), 1);

        tokio::time::sleep(DELAY * 3).await;
        assert_eq!(service.size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_response_still_applies() {
        let boot = booted().await;
        let service = service(&boot);

        drop(service.enqueue(aircraft(AircraftType::Cargo, AircraftSize::Small, 1)));
        assert_eq!(service.size(), 0);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(service.size(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_check_sees_earlier_requests() -> Result<(), QueueError> {
        let boot = booted().await;
        let service = service(&boot);
        let cargo = aircraft(AircraftType::Cargo, AircraftSize::Large, 1);

        // queue is still empty when the dequeue is issued
        let enqueued = service.enqueue(cargo.clone());
        let dequeued = service.dequeue();
        assert_eq!(service.size(), 0);

        enqueued.await?;
        assert_eq!(dequeued.await?, cargo);
        assert_eq!(service.size(), 0);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatcher_closed() {
        let boot = booted().await;
        let (service, dispatcher) =
            QueueService::with_queue(boot, SortedQueue::new(), DELAY);
        drop(dispatcher);

        assert!(matches!(
            service
                .enqueue(aircraft(AircraftType::Cargo, AircraftSize::Small, 1))
                .await,
            Err(QueueError::DispatcherClosed)
        ));
    }

    #[test]
    fn test_intake_clock_strictly_increases() {
        let clock = IntakeClock::new();
        let stamps = (0..5).map(|_| clock.stamp()).collect::<Vec<_>>();

        for pair in stamps.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
