// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named fire-and-forget actions.
//!
//! Listeners receive the widget class name and a mutable borrow of the handler
//! about to run, so they can observe a dispatch or adjust the instance before
//! its callback. Return values are not collected.

use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::WidgetCallbackHandler;

pub type ActionListener = Arc<dyn Fn(&str, &mut dyn WidgetCallbackHandler) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ActionHooks {
    listeners: HashMap<String, Vec<ActionListener>>,
}

impl ActionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action<F>(&mut self, name: impl Into<String>, listener: F)
    where
        F: Fn(&str, &mut dyn WidgetCallbackHandler) + Send + Sync + 'static,
    {
        self.listeners
            .entry(name.into())
            .or_default()
            .push(Arc::new(listener));
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.listeners.get(name).is_some_and(|l| !l.is_empty())
    }

    /// Invoke every listener for `name` in registration order.
    ///
    /// Returns how many listeners ran.
    pub fn do_action(
        &self,
        name: &str,
        class_name: &str,
        handler: &mut dyn WidgetCallbackHandler,
    ) -> usize {
        let Some(listeners) = self.listeners.get(name) else {
            return 0;
        };

        for listener in listeners {
            listener(class_name, &mut *handler);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for ActionHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(name, l)| (name.as_str(), l.len()))
            .collect();
        f.debug_struct("ActionHooks").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WidgetError;
    use crate::request::RequestContext;
    use crate::traits::AjaxResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Plain {
        id: String,
    }

    #[async_trait]
    impl WidgetCallbackHandler for Plain {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }

        async fn ajax(&mut self, _ctx: &RequestContext) -> Result<AjaxResponse, WidgetError> {
            Err(WidgetError::NotImplemented)
        }
    }

    #[test]
    fn test_listeners_run_in_order_and_can_mutate() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = ActionHooks::new();

        let first = calls.clone();
        hooks.add_action("dispatch", move |class_name, handler| {
            first.lock().unwrap().push(format!("first:{class_name}:{}", handler.id()));
            handler.set_id("rewritten".to_string());
        });
        let second = calls.clone();
        hooks.add_action("dispatch", move |_, handler| {
            second.lock().unwrap().push(format!("second:{}", handler.id()));
        });

        let mut widget = Plain {
            id: "orig".to_string(),
        };
        let ran = hooks.do_action("dispatch", "plain", &mut widget);

        assert_eq!(ran, 2);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first:plain:orig".to_string(), "second:rewritten".to_string()]
        );
        assert_eq!(widget.id, "rewritten");
    }

    #[test]
    fn test_unknown_action_is_a_no_op() {
        let hooks = ActionHooks::new();
        let mut widget = Plain { id: String::new() };

        assert!(!hooks.has_action("dispatch"));
        assert_eq!(hooks.do_action("dispatch", "plain", &mut widget), 0);
    }
}
