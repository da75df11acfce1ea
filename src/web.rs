#![forbid(unsafe_code)]

use std::{cell::RefCell, io, rc::Rc, sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use wasm_bindgen::{JsCast, prelude::*};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, Node,
    Window,
};

use crate::{
    client::{ShortenerApi, shortener_api_capsule},
    config,
    controller::{ResolveFlow, ShortenFlow},
    copy::CopyFlow,
    page::{ButtonLabel, Clipboard, Navigator, ResultSlot, Timer},
    topbar::{Menu, MenuEvent, MenuView, suppress_logo_navigation},
    view::ResultView,
};

/// Panel children that take part in keyboard navigation.
const FOCUSABLE_ITEMS: &str = "a[href], button, input, select, textarea, [tabindex]";

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{value:?}")
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

/// Forwards each formatted log line to the browser console.
struct ConsoleWriter;

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn install_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter)
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .try_init();
    if let Err(err) = installed {
        web_sys::console::warn_1(&JsValue::from_str(&format!("tracing not installed: {err}")));
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> anyhow::Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_error)
        .with_context(|| format!("Failed to attach {kind} listener"))?;
    // listeners live as long as the page
    closure.forget();
    Ok(())
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .with_context(|| format!("#{id} is missing from the page"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("#{id} is not the expected kind of element"))
}

struct DomResultSlot(HtmlElement);

impl ResultSlot for DomResultSlot {
    fn show(&self, view: &ResultView) {
        self.0.set_text_content(Some(&view.text));
        if let Err(err) = self.0.style().set_property("color", view.tone.color()) {
            warn!(?err, "Failed to color result");
        }
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default().trim().to_owned()
    }
}

struct LocationNavigator(Window);

impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        if let Err(err) = self.0.location().set_href(path) {
            error!(?err, path, "Navigation failed");
        }
    }
}

struct DomButtonLabel(HtmlElement);

impl ButtonLabel for DomButtonLabel {
    fn set_label(&self, label: &str) {
        self.0.set_text_content(Some(label));
    }
}

struct BrowserClipboard(Window);

#[async_trait(?Send)]
impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let promise = self.0.navigator().clipboard().write_text(text);
        JsFuture::from(promise)
            .await
            .map_err(js_error)
            .context("Clipboard write was rejected")?;
        Ok(())
    }
}

struct WindowTimer(Window);

impl Timer for WindowTimer {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = self
            .0
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            warn!(?err, "Failed to schedule timer");
        }
    }
}

struct MenuDom {
    container: Element,
    trigger: HtmlElement,
    panel: Option<Element>,
}

impl MenuDom {
    fn apply(&self, view: &MenuView) {
        if let Err(err) = self.try_apply(view) {
            warn!(?err, "Failed to update menu attributes");
        }
    }

    fn try_apply(&self, view: &MenuView) -> anyhow::Result<()> {
        self.container
            .class_list()
            .toggle_with_force("open", view.open)
            .map_err(js_error)?;
        self.trigger
            .set_attribute("aria-expanded", view.aria_expanded)
            .map_err(js_error)?;

        let Some(panel) = &self.panel else {
            return Ok(());
        };
        panel
            .set_attribute("aria-hidden", view.panel_aria_hidden)
            .map_err(js_error)?;
        let tab_index = view.item_tab_index.to_string();
        let items = panel.query_selector_all(FOCUSABLE_ITEMS).map_err(js_error)?;
        for idx in 0..items.length() {
            if let Some(item) = items.get(idx).and_then(|node| node.dyn_into::<Element>().ok()) {
                item.set_attribute("tabindex", &tab_index).map_err(js_error)?;
            }
        }
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    install_tracing();
    mount().map_err(|err| {
        error!(?err, "Failed to mount page controller");
        JsValue::from_str(&format!("{err:#}"))
    })
}

fn mount() -> anyhow::Result<()> {
    let window = web_sys::window().context("No window")?;
    let document = window.document().context("No document")?;

    let origin = window.location().origin().map_err(js_error)?;
    let container = config::init_container(config::parse_base_url(&origin)?);
    let api = container.read(shortener_api_capsule);

    let short_url_slot: Rc<dyn ResultSlot> =
        Rc::new(DomResultSlot(element_by_id(&document, "shortUrlValue")?));
    let shorten = Rc::new(ShortenFlow::new(Arc::clone(&api), Rc::clone(&short_url_slot)));
    mount_shorten(&document, &shorten)?;
    mount_copy(&window, &document, &shorten, short_url_slot)?;
    mount_resolve(&window, &document, api)?;
    mount_menu(&document)?;
    mount_logo(&window, &document)?;

    info!(%origin, "Page controller mounted");
    Ok(())
}

fn mount_shorten(document: &Document, shorten: &Rc<ShortenFlow>) -> anyhow::Result<()> {
    let button: HtmlElement = element_by_id(document, "shortenBtn")?;
    let long_url: HtmlInputElement = element_by_id(document, "longUrl")?;
    let custom_code: Option<HtmlInputElement> = element_by_id(document, "customCode").ok();

    let shorten = Rc::clone(shorten);
    listen(&button, "click", move |_| {
        let url = long_url.value();
        let code = custom_code.as_ref().map(HtmlInputElement::value);
        let flow = Rc::clone(&shorten);
        spawn_local(async move {
            let _ = flow.submit(&url, code.as_deref()).await;
        });
    })
}

fn mount_copy(
    window: &Window,
    document: &Document,
    shorten: &ShortenFlow,
    slot: Rc<dyn ResultSlot>,
) -> anyhow::Result<()> {
    let button: HtmlElement = element_by_id(document, "copyBtn")?;
    let copy = Rc::new(CopyFlow::new(
        shorten.model(),
        slot,
        Rc::new(BrowserClipboard(window.clone())),
        Rc::new(DomButtonLabel(button.clone())),
        Rc::new(WindowTimer(window.clone())),
    ));

    listen(&button, "click", move |_| {
        let flow = Rc::clone(&copy);
        spawn_local(async move {
            flow.copy().await;
        });
    })
}

fn mount_resolve(
    window: &Window,
    document: &Document,
    api: Arc<dyn ShortenerApi>,
) -> anyhow::Result<()> {
    let button: HtmlElement = element_by_id(document, "goBtn")?;
    let code_input: HtmlInputElement = element_by_id(document, "codeInput")?;
    let resolve = Rc::new(ResolveFlow::new(
        api,
        Rc::new(DomResultSlot(element_by_id(document, "resolveValue")?)),
        Rc::new(LocationNavigator(window.clone())),
    ));

    listen(&button, "click", move |_| {
        let code = code_input.value();
        let flow = Rc::clone(&resolve);
        spawn_local(async move {
            let _ = flow.submit(&code).await;
        });
    })
}

fn mount_menu(document: &Document) -> anyhow::Result<()> {
    let Some(container) = document.query_selector(".topbar-menu").map_err(js_error)? else {
        debug!("No menu in markup");
        return Ok(());
    };
    let Some(trigger) = container.query_selector(".menu-trigger").map_err(js_error)? else {
        debug!("Menu has no trigger");
        return Ok(());
    };
    let trigger = trigger
        .dyn_into::<HtmlElement>()
        .map_err(|_| anyhow!(".menu-trigger is not an HTML element"))?;
    let panel = container.query_selector(".menu-panel").map_err(js_error)?;

    let (menu, initial) = Menu::from_markup(container.class_list().contains("open"));
    let dom = Rc::new(MenuDom {
        container,
        trigger,
        panel,
    });
    dom.apply(&initial);
    let menu = Rc::new(RefCell::new(menu));

    {
        let dom_ref = Rc::clone(&dom);
        let menu = Rc::clone(&menu);
        listen(&dom.trigger, "click", move |event| {
            let transition = menu.borrow_mut().handle(MenuEvent::TriggerClick);
            if transition.stop_propagation {
                event.stop_propagation();
            }
            dom_ref.apply(&transition.view);
        })?;
    }

    {
        let dom_ref = Rc::clone(&dom);
        let menu = Rc::clone(&menu);
        listen(document, "click", move |event| {
            let inside = event
                .target()
                .and_then(|target| target.dyn_into::<Node>().ok())
                .is_some_and(|node| dom_ref.container.contains(Some(&node)));
            if !inside {
                let transition = menu.borrow_mut().handle(MenuEvent::OutsideClick);
                dom_ref.apply(&transition.view);
            }
        })?;
    }

    let dom_ref = Rc::clone(&dom);
    listen(document, "keydown", move |event| {
        let is_escape = event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Escape");
        if !is_escape {
            return;
        }
        let transition = menu.borrow_mut().handle(MenuEvent::Escape);
        dom_ref.apply(&transition.view);
        if transition.focus_trigger {
            if let Err(err) = dom_ref.trigger.focus() {
                warn!(?err, "Failed to focus menu trigger");
            }
        }
    })
}

fn mount_logo(window: &Window, document: &Document) -> anyhow::Result<()> {
    let Some(logo) = document.query_selector(".logo").map_err(js_error)? else {
        return Ok(());
    };
    let window = window.clone();
    listen(&logo, "click", move |event| {
        let path = window.location().pathname().unwrap_or_default();
        if suppress_logo_navigation(&path) {
            event.prevent_default();
        }
    })
}
