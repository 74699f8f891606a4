//! Leaflet Bindings
//!
//! Minimal `wasm_bindgen` bindings for the parts of Leaflet (and
//! leaflet.markercluster) the maps use. Both libraries are loaded from
//! `index.html` and exposed as the global `L`.

use js_sys::{Array, Function, Object, Reflect};
use leptos::{on_cleanup, store_value, StoredValue};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// OpenStreetMap tiles
pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Geographic center of Tunisia, for the country-wide maps
pub const TUNISIA_CENTER: (f64, f64) = (34.0, 9.5);
pub const TUNISIA_ZOOM: f64 = 7.0;

#[wasm_bindgen]
extern "C" {
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn create_map(element: &web_sys::HtmlElement, options: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue) -> Map;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Map) -> Map;

    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &Map) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Layer, content: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(method)]
    pub fn on(this: &Layer, event: &str, handler: &Function) -> Layer;

    #[wasm_bindgen(extends = Layer)]
    pub type LayerGroup;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LayerGroup, layer: &Layer) -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &LayerGroup) -> LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    pub fn circle_marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    pub fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn layer_group() -> LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = markerClusterGroup)]
    pub fn marker_cluster_group(options: &JsValue) -> LayerGroup;
}

/// Create a map in `element` with the OpenStreetMap tile layer attached
pub fn mount(element: &web_sys::HtmlElement, center: (f64, f64), zoom: f64) -> Map {
    let map = create_map(element, &options(&[("zoomControl", JsValue::TRUE)]));
    map.set_view(&lat_lng(center.0, center.1), zoom);
    tile_layer(
        TILE_URL,
        &options(&[
            ("attribution", JsValue::from_str(TILE_ATTRIBUTION)),
            ("maxZoom", JsValue::from_f64(19.0)),
        ]),
    )
    .add_to(&map);
    map
}

/// Values kept alive until the next [`Retained::clear`] or until the owning
/// component is disposed
pub struct Retained<T: 'static>(StoredValue<Vec<T>>);

impl<T: 'static> Clone for Retained<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Retained<T> {}

impl<T: 'static> Retained<T> {
    /// Must be called inside a component
    pub fn new() -> Self {
        Self(store_value(Vec::new()))
    }

    pub fn keep(&self, value: T) {
        self.0.update_value(|values| values.push(value));
    }

    pub fn clear(&self) {
        self.0.update_value(Vec::clear);
    }

    pub fn len(&self) -> usize {
        self.0.with_value(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A component's map and its one redrawable layer.
///
/// The map is created on the first draw, once the container element exists,
/// and removed when the owning component is cleaned up. Event handlers
/// attached through [`MapSlot::on_click`] are dropped on every redraw.
#[derive(Clone, Copy)]
pub struct MapSlot {
    center: (f64, f64),
    zoom: f64,
    map: StoredValue<Option<Map>>,
    layer: StoredValue<Option<LayerGroup>>,
    handlers: Retained<Closure<dyn FnMut()>>,
}

impl MapSlot {
    /// Must be called inside a component
    pub fn new(center: (f64, f64), zoom: f64) -> Self {
        let slot = Self {
            center,
            zoom,
            map: store_value(None),
            layer: store_value(None),
            handlers: Retained::new(),
        };
        on_cleanup(move || {
            slot.map.with_value(|map| {
                if let Some(map) = map {
                    map.remove();
                }
            });
        });
        slot
    }

    pub fn is_mounted(&self) -> bool {
        self.map.with_value(Option::is_some)
    }

    /// Attach a click handler to a layer drawn in this slot. The handler
    /// lives until the next redraw.
    pub fn on_click(&self, layer: &Layer, handler: impl FnMut() + 'static) {
        let closure = Closure::<dyn FnMut()>::new(handler);
        layer.on("click", closure.as_ref().unchecked_ref());
        self.handlers.keep(closure);
    }

    /// Clear the layer and repopulate it with `draw`, creating the map and
    /// layer (from `new_layer`) on first use
    pub fn redraw(
        &self,
        element: &web_sys::HtmlElement,
        new_layer: impl FnOnce() -> LayerGroup,
        draw: impl FnOnce(&Map, &LayerGroup),
    ) {
        if !self.is_mounted() {
            let map = mount(element, self.center, self.zoom);
            let layer = new_layer();
            layer.add_to(&map);
            self.map.set_value(Some(map));
            self.layer.set_value(Some(layer));
        }

        self.handlers.clear();
        self.map.with_value(|map| {
            self.layer.with_value(|layer| {
                if let (Some(map), Some(layer)) = (map, layer) {
                    layer.clear_layers();
                    draw(map, layer);
                }
            })
        });
    }
}

/// Fit the view to `points`; no-op when empty
pub fn fit_to(map: &Map, points: &[(f64, f64)]) {
    if points.is_empty() {
        return;
    }
    let bounds: Array = points.iter().map(|(lat, lng)| lat_lng(*lat, *lng)).collect();
    let padding: Array = [JsValue::from_f64(50.0), JsValue::from_f64(50.0)]
        .into_iter()
        .collect();
    map.fit_bounds(&bounds, &options(&[("padding", padding.into())]));
}


pub fn lat_lng(lat: f64, lng: f64) -> JsValue {
    let pair: Array = [JsValue::from_f64(lat), JsValue::from_f64(lng)]
        .into_iter()
        .collect();
    pair.into()
}

/// Plain JS object from key/value pairs
pub fn options(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

/// Escape text for interpolation into popup HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::create_runtime;

    #[test]
    fn test_retained_values_are_released_on_clear() {
        let runtime = create_runtime();
        let retained = Retained::<u32>::new();

        retained.keep(1);
        retained.keep(2);
        assert_eq!(retained.len(), 2);

        retained.clear();
        assert!(retained.is_empty());

        retained.keep(3);
        assert_eq!(retained.len(), 1);

        runtime.dispose();
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Dr. Ben <Ali> & \"Fils\""), "Dr. Ben &lt;Ali&gt; &amp; &quot;Fils&quot;");
        assert_eq!(escape_html("Cité El Ghazela"), "Cité El Ghazela");
    }
}
