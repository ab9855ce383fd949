use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Look up an element by id and cast it to a concrete element type.
pub fn typed_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("missing #{id}"))?
        .dyn_into::<T>()
        .map_err(|e| anyhow!("#{id} has unexpected type: {:?}", e))
}

#[inline]
pub fn input_by_id(document: &web::Document, id: &str) -> Option<web::HtmlInputElement> {
    typed_by_id::<web::HtmlInputElement>(document, id).ok()
}

#[inline]
pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

/// Set a custom property on the document's root element.
pub fn set_css_var(document: &web::Document, name: &str, value: &str) {
    if let Some(root) = document
        .document_element()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        let _ = root.style().set_property(name, value);
    }
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Listen for `input` events on an `<input>` and hand the element to `handler`.
pub fn add_input_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(&web::HtmlInputElement) + 'static,
) {
    let Some(input) = input_by_id(document, element_id) else {
        log::warn!("[controls] missing input #{element_id}");
        return;
    };
    let target = input.clone();
    let closure = Closure::wrap(Box::new(move || handler(&target)) as Box<dyn FnMut()>);
    let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// `change` fires for checkboxes in every browser; `input` does not everywhere.
pub fn add_change_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(&web::HtmlInputElement) + 'static,
) {
    let Some(input) = input_by_id(document, element_id) else {
        log::warn!("[controls] missing input #{element_id}");
        return;
    };
    let target = input.clone();
    let closure = Closure::wrap(Box::new(move || handler(&target)) as Box<dyn FnMut()>);
    let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn add_document_listener(
    document: &web::Document,
    event: &str,
    mut handler: impl FnMut() + 'static,
) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Screen width in CSS pixels, used as the box-size control's maximum.
pub fn screen_width() -> Option<i32> {
    web::window()
        .and_then(|w| w.screen().ok())
        .and_then(|s| s.width().ok())
}
