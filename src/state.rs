use crate::{
    api::DeskApi,
    config::RuntimeConfiguration,
    dashboard::Dashboard,
    maud_conveniences::{Tab, render_sidebar},
    store::MockStore,
};
use maud::{DOCTYPE, Markup, html};
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct DeskState {
    dashboard: Dashboard,
    config: RuntimeConfiguration,
}

impl DeskState {
    pub fn new(config: RuntimeConfiguration) -> Self {
        let store = MockStore::from_config(&config.store_config());
        let dashboard = Dashboard::new(DeskApi::new(Arc::new(store)));

        Self::with_dashboard(dashboard, config)
    }

    pub fn with_dashboard(dashboard: Dashboard, config: RuntimeConfiguration) -> Self {
        Self { dashboard, config }
    }

    pub fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, tab: Tab, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Rollbook - " (tab.name()) }
                }
                body hx-ext="sse" sse-connect="/sse_feed" class="bg-gray-950 min-h-screen flex text-white" {
                    (render_sidebar(tab))
                    div class="flex-1 ml-64 min-h-screen flex flex-col" {
                        div id="notifications" class="mx-8 mt-4" sse-swap="notification" hx-swap="beforeend" {}
                        (markup)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
impl DeskState {
    ///seeded, no latency, never fails
    pub fn for_tests() -> Self {
        let store = MockStore::seeded().with_latency(crate::store::Latency::none());
        let config = RuntimeConfiguration::from_lookup(|_| Ok(None)).expect("defaults always parse");
        Self::with_dashboard(Dashboard::new(DeskApi::new(Arc::new(store))), config)
    }
}

impl Deref for DeskState {
    type Target = Dashboard;

    fn deref(&self) -> &Self::Target {
        &self.dashboard
    }
}
