//! Recommendations Map
//!
//! Leaflet map beside the chat, showing every recommended doctor. Clicking a
//! marker opens its popup and selects the doctor.

use leptos::*;
use wasm_bindgen::JsValue;

use tunimed::types::{Doctor, UserLocation};

use crate::leaflet::{self, escape_html, MapSlot};
use crate::state::global::GlobalState;

const HOME_ZOOM: f64 = 13.0;

/// Map of recommended doctors with the selected-doctor card
#[component]
pub fn MapView() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let doctors = state.recommended_doctors;
    let location = state.user_location;
    let selected = state.selected_doctor;

    let container = create_node_ref::<html::Div>();
    let initial = location.get_untracked();
    let slot = MapSlot::new((initial.lat, initial.lng), HOME_ZOOM);

    create_effect(move |previous: Option<UserLocation>| {
        let doctors = doctors.get();
        let location = location.get();
        let Some(element) = container.get() else {
            return location;
        };

        let recenter = slot.is_mounted() && previous != Some(location);
        slot.redraw(&element, leaflet::layer_group, |map, group| {
            if recenter {
                map.set_view(&leaflet::lat_lng(location.lat, location.lng), HOME_ZOOM);
            }
            for doctor in doctors {
                let marker = leaflet::marker(
                    &leaflet::lat_lng(doctor.lat, doctor.lng),
                    &leaflet::options(&[]),
                );
                marker.bind_popup(&doctor_popup(&doctor), &JsValue::UNDEFINED);
                slot.on_click(&marker, move || {
                    let _ = selected.try_set(Some(doctor.clone()));
                });
                group.add_layer(&marker);
            }
        });

        location
    });

    view! {
        <div class="h-full w-full relative">
            <div node_ref=container class="h-full w-full" style="z-index: 0" />

            {move || {
                if doctors.with(Vec::is_empty) {
                    view! {
                        <div class="absolute inset-0 z-[1000] flex items-center justify-center bg-white bg-opacity-90 pointer-events-none">
                            <div class="text-center">
                                <h3 class="text-lg font-medium text-gray-900 mb-2">"No doctors to display"</h3>
                                <p class="text-sm text-gray-500">"Ask the AI assistant to find doctors for you"</p>
                            </div>
                        </div>
                    }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}

            {move || selected.get().map(|doctor| view! { <SelectedDoctorCard doctor=doctor /> })}
        </div>
    }
}

/// Details of the selected doctor, pinned to the bottom of the map
#[component]
fn SelectedDoctorCard(doctor: Doctor) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="absolute bottom-4 left-4 right-4 z-[1000] bg-white rounded-lg shadow-lg p-4 flex items-start justify-between">
            <div>
                <h3 class="font-semibold text-gray-900">{doctor.name}</h3>
                <p class="text-sm text-blue-600">{doctor.specialty}</p>
                <p class="text-xs text-gray-500 mt-1">{doctor.address}</p>
                <p class="text-xs text-gray-700 mt-1">"📞 " {doctor.phone}</p>
            </div>
            <button
                class="text-gray-400 hover:text-gray-700 text-lg leading-none"
                title="Close"
                on:click=move |_| state.set_selected_doctor(None)
            >
                "✕"
            </button>
        </div>
    }
}

fn doctor_popup(doctor: &Doctor) -> String {
    format!(
        "<div class=\"p-2\">\
         <h3 class=\"font-semibold text-gray-900\">{}</h3>\
         <p class=\"text-sm text-gray-600\">{}</p>\
         <p class=\"text-xs text-gray-500 mt-1\">{}</p>\
         <p class=\"text-xs text-blue-600 mt-1\">{}</p>\
         </div>",
        escape_html(&doctor.name),
        escape_html(&doctor.specialty),
        escape_html(&doctor.address),
        escape_html(&doctor.phone),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunimed::catalog::sample_doctors;

    #[test]
    fn test_doctor_popup_lists_contact_details() {
        let doctor = &sample_doctors()[0];
        let html = doctor_popup(doctor);
        assert!(html.contains(&escape_html(&doctor.name)));
        assert!(html.contains(&escape_html(&doctor.phone)));
        assert!(html.starts_with("<div"));
    }
}
