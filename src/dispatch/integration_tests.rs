use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use crate::config::consts::WIDGET_AJAX_DISPATCH;
use crate::dispatch::{add_query_args, CallbackDispatcher};
use crate::errors::{PipelineError, WidgetError, AJAX_NOT_IMPLEMENTED};
use crate::hooks::ActionHooks;
use crate::nonce::{FixedClock, HmacNonces};
use crate::pipeline::{InitOutcome, RequestPipeline, Termination};
use crate::registry::{WidgetConstruction, WidgetRegistry};
use crate::request::RequestContext;
use crate::traits::{AjaxResponse, NonceIssuer, WidgetCallbackHandler};

/// End-to-end dispatch tests using widgets that record what happened to them
#[cfg(test)]
mod tests {
    use super::*;

    const LIFETIME: u64 = 86_400;
    const BASE: &str = "http://example.test/page";

    #[derive(Default)]
    struct Probe {
        constructed: AtomicUsize,
        ajax_calls: AtomicUsize,
        modes: Mutex<Vec<WidgetConstruction>>,
        ids: Mutex<Vec<String>>,
    }

    struct RecordingWidget {
        id: String,
        probe: Arc<Probe>,
        failure: Option<WidgetError>,
    }

    #[async_trait]
    impl WidgetCallbackHandler for RecordingWidget {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        async fn ajax(&mut self, ctx: &RequestContext) -> Result<AjaxResponse, WidgetError> {
            self.probe.ajax_calls.fetch_add(1, Ordering::SeqCst);
            self.probe.ids.lock().unwrap().push(self.id.clone());
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(AjaxResponse::text(format!(
                    "{}:{}",
                    self.id,
                    ctx.param("extra").unwrap_or("")
                ))),
            }
        }
    }

    struct Harness {
        dispatcher: Arc<CallbackDispatcher>,
        nonces: Arc<HmacNonces>,
        clock: Arc<FixedClock>,
        probe: Arc<Probe>,
        broadcasts: Arc<Mutex<Vec<(String, String)>>>,
    }

    fn recording_factory(
        probe: Arc<Probe>,
        failure: Option<WidgetError>,
    ) -> impl Fn(WidgetConstruction) -> Box<dyn WidgetCallbackHandler> + Send + Sync + 'static {
        move |construction| {
            probe.constructed.fetch_add(1, Ordering::SeqCst);
            probe.modes.lock().unwrap().push(construction);
            Box::new(RecordingWidget {
                id: "default".to_string(),
                probe: probe.clone(),
                failure: failure.clone(),
            })
        }
    }

    fn harness_with_hooks(extra_hooks: impl FnOnce(&mut ActionHooks)) -> Harness {
        let probe = Arc::new(Probe::default());
        let mut registry = WidgetRegistry::new();
        registry
            .register("MyWidget", recording_factory(probe.clone(), None))
            .unwrap();
        registry
            .register(
                "Silent",
                recording_factory(probe.clone(), Some(WidgetError::NotImplemented)),
            )
            .unwrap();

        let broadcasts = Arc::new(Mutex::new(Vec::new()));
        let recorded = broadcasts.clone();
        let mut hooks = ActionHooks::new();
        hooks.add_action(WIDGET_AJAX_DISPATCH, move |class_name, handler| {
            recorded
                .lock()
                .unwrap()
                .push((class_name.to_string(), handler.id().to_string()));
        });
        extra_hooks(&mut hooks);

        let clock = Arc::new(FixedClock::new(5_000_000));
        let nonces = Arc::new(
            HmacNonces::with_clock(b"integration-secret-0123456789", LIFETIME, clock.clone())
                .unwrap(),
        );
        let dispatcher = Arc::new(CallbackDispatcher::new(
            Arc::new(registry),
            Arc::new(hooks),
            nonces.clone(),
        ));

        Harness {
            dispatcher,
            nonces,
            clock,
            probe,
            broadcasts,
        }
    }

    fn harness() -> Harness {
        harness_with_hooks(|_| {})
    }

    fn ctx_with(pairs: &[(&str, &str)]) -> RequestContext {
        let mut url = Url::parse(BASE).unwrap();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        RequestContext::from_url(url)
    }

    fn assert_nothing_constructed(h: &Harness) {
        assert_eq!(h.probe.constructed.load(Ordering::SeqCst), 0);
        assert_eq!(h.probe.ajax_calls.load(Ordering::SeqCst), 0);
        assert!(h.broadcasts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_requests_without_trigger_continue_untouched() {
        let h = harness();

        for ctx in [
            ctx_with(&[]),
            ctx_with(&[("page", "2")]),
            ctx_with(&[("widget_ajax", ""), ("nonce", "abc")]),
        ] {
            assert_eq!(h.dispatcher.handle_request_init(&ctx).await, InitOutcome::Continue);
        }
        assert_nothing_constructed(&h);
    }

    #[tokio::test]
    async fn test_bad_nonce_never_constructs_a_valid_class() {
        let h = harness();
        let other_scope = h.nonces.create("Silent");

        for nonce in [None, Some(""), Some("0000000000"), Some(other_scope.as_str())] {
            let mut pairs = vec![("widget_ajax", "MyWidget"), ("widget_id", "42")];
            if let Some(nonce) = nonce {
                pairs.push(("nonce", nonce));
            }
            let outcome = h.dispatcher.handle_request_init(&ctx_with(&pairs)).await;
            assert_eq!(outcome, InitOutcome::Terminate(Termination::Exit));
        }
        assert_nothing_constructed(&h);
    }

    #[tokio::test]
    async fn test_unregistered_class_with_valid_nonce_still_terminates() {
        let h = harness();
        let nonce = h.nonces.create("UnknownClass");

        let ctx = ctx_with(&[("widget_ajax", "UnknownClass"), ("nonce", nonce.as_str())]);
        let outcome = h.dispatcher.handle_request_init(&ctx).await;

        assert_eq!(outcome, InitOutcome::Terminate(Termination::Exit));
        assert_nothing_constructed(&h);
    }

    #[tokio::test]
    async fn test_valid_request_dispatches_exactly_once() {
        let h = harness();
        let nonce = h.nonces.create("MyWidget");

        let ctx = ctx_with(&[
            ("widget_ajax", "MyWidget"),
            ("nonce", nonce.as_str()),
            ("widget_id", "42"),
            ("extra", "hello"),
        ]);
        let outcome = h.dispatcher.handle_request_init(&ctx).await;

        assert_eq!(
            outcome,
            InitOutcome::Terminate(Termination::Respond(AjaxResponse::text("42:hello")))
        );
        assert_eq!(h.probe.constructed.load(Ordering::SeqCst), 1);
        assert_eq!(h.probe.ajax_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *h.probe.modes.lock().unwrap(),
            vec![WidgetConstruction::CallbackOnly]
        );
        assert_eq!(
            *h.broadcasts.lock().unwrap(),
            vec![("MyWidget".to_string(), "42".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_widget_id_keeps_default() {
        let h = harness();
        let nonce = h.nonces.create("MyWidget");

        let ctx = ctx_with(&[("widget_ajax", "MyWidget"), ("nonce", nonce.as_str()), ("widget_id", "")]);
        h.dispatcher.handle_request_init(&ctx).await;

        assert_eq!(*h.probe.ids.lock().unwrap(), vec!["default".to_string()]);
    }

    #[tokio::test]
    async fn test_dispatch_hook_can_adjust_the_instance() {
        let h = harness_with_hooks(|hooks| {
            hooks.add_action(WIDGET_AJAX_DISPATCH, |_, handler| {
                let id = format!("{}-seen", handler.id());
                handler.set_id(id);
            });
        });
        let nonce = h.nonces.create("MyWidget");

        let ctx = ctx_with(&[("widget_ajax", "MyWidget"), ("nonce", nonce.as_str()), ("widget_id", "7")]);
        h.dispatcher.handle_request_init(&ctx).await;

        assert_eq!(*h.probe.ids.lock().unwrap(), vec!["7-seen".to_string()]);
    }

    #[tokio::test]
    async fn test_callback_failure_is_fatal() {
        let h = harness();
        let nonce = h.nonces.create("Silent");

        let ctx = ctx_with(&[("widget_ajax", "Silent"), ("nonce", nonce.as_str())]);
        let outcome = h.dispatcher.handle_request_init(&ctx).await;

        assert_eq!(
            outcome,
            InitOutcome::Terminate(Termination::Die {
                message: AJAX_NOT_IMPLEMENTED.to_string()
            })
        );
        assert_eq!(h.probe.ajax_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ajax_url_round_trips_through_dispatch() {
        let h = harness();
        let widget = RecordingWidget {
            id: "42".to_string(),
            probe: h.probe.clone(),
            failure: None,
        };
        let current = Url::parse(BASE).unwrap();

        let url = widget.ajax_url(&current, "MyWidget", h.nonces.as_ref());
        let outcome = h
            .dispatcher
            .handle_request_init(&RequestContext::from_url(url.clone()))
            .await;
        assert_eq!(
            outcome,
            InitOutcome::Terminate(Termination::Respond(AjaxResponse::text("42:")))
        );

        // Same nonce presented for a different class
        let swapped = add_query_args(&url, &[("widget_ajax", Some("Silent".to_string()))]);
        let outcome = h
            .dispatcher
            .handle_request_init(&RequestContext::from_url(swapped))
            .await;
        assert_eq!(outcome, InitOutcome::Terminate(Termination::Exit));
        assert_eq!(h.probe.ajax_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nonce_from_previous_tick_still_dispatches() {
        let h = harness();
        let nonce = h.nonces.create("MyWidget");
        let ctx = ctx_with(&[("widget_ajax", "MyWidget"), ("nonce", nonce.as_str())]);

        h.clock.advance(LIFETIME / 2);
        assert!(matches!(
            h.dispatcher.handle_request_init(&ctx).await,
            InitOutcome::Terminate(Termination::Respond(_))
        ));

        h.clock.advance(LIFETIME / 2);
        assert_eq!(
            h.dispatcher.handle_request_init(&ctx).await,
            InitOutcome::Terminate(Termination::Exit)
        );
        assert_eq!(h.probe.ajax_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loaded_dispatcher_runs_in_pipeline() {
        let h = harness();
        let mut pipeline = RequestPipeline::new();
        h.dispatcher.clone().load(&mut pipeline).unwrap();

        assert_eq!(
            pipeline.run_init(&ctx_with(&[("page", "1")])).await,
            InitOutcome::Continue
        );

        let nonce = h.nonces.create("MyWidget");
        let outcome = pipeline
            .run_init(&ctx_with(&[("widget_ajax", "MyWidget"), ("nonce", nonce.as_str())]))
            .await;
        assert!(matches!(outcome, InitOutcome::Terminate(Termination::Respond(_))));
    }

    #[test]
    fn test_loading_twice_is_rejected() {
        let h = harness();
        let mut pipeline = RequestPipeline::new();

        h.dispatcher.clone().load(&mut pipeline).unwrap();
        assert_eq!(
            h.dispatcher.clone().load(&mut pipeline),
            Err(PipelineError::DuplicateListener("widget_ajax".to_string()))
        );
    }
}
