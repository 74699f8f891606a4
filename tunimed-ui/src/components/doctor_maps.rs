//! Doctor Maps
//!
//! The three dataset maps on the dashboard:
//! - [`DoctorsMap`]: one pin per doctor, specialty and governorate filters
//! - [`ClusterMap`]: proximity clusters drawn as sized circles
//! - [`InteractiveMap`]: leaflet.markercluster with ranked filters, hours
//!   and profile links
//!
//! Each map fetches its CSV once on mount. A fetch failure is logged and
//! leaves the map empty. Results arriving after the component is gone are
//! dropped (signal writes use `try_set`).

use leptos::*;
use wasm_bindgen::JsValue;

use tunimed::config::{DEFAULT_DIRECTORY_CSV, DEFAULT_PROFILES_CSV};
use tunimed::dataset::{
    cluster_points, distinct_sorted, parse_csv, rank_by_frequency, selection, Cluster,
    ClusterRadius, CsvSchema, Dataset, DatasetError, DirectoryRecord, DoctorFilter, DoctorRecord,
    ProfileRecord, ALL, TIERS,
};

use crate::api;
use crate::components::LoadingOverlay;
use crate::leaflet::{self, escape_html, MapSlot, TUNISIA_CENTER, TUNISIA_ZOOM};

async fn fetch_dataset<T: CsvSchema + DoctorRecord>(path: &str) -> Result<Dataset<T>, DatasetError> {
    let text = api::fetch_text(path).await?;
    parse_csv(&text)
}

/// Load `path` into `records` in the background, then clear `loading`
fn load_dataset<T>(path: &'static str, records: RwSignal<Vec<T>>, loading: RwSignal<bool>)
where
    T: CsvSchema + DoctorRecord + Clone + 'static,
{
    spawn_local(async move {
        let rows = match fetch_dataset::<T>(path).await {
            Ok(dataset) => {
                web_sys::console::log_1(
                    &format!("Loaded {} doctors from {}", dataset.len(), path).into(),
                );
                dataset.records
            }
            Err(e) => {
                web_sys::console::error_1(&format!("Error loading doctors data: {}", e).into());
                Vec::new()
            }
        };

        if records.try_set(rows).is_some() {
            return;
        }
        let _ = loading.try_set(false);
    });
}

fn coordinates<T: DoctorRecord>(records: &[&T]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.lat(), r.lng())).collect()
}

// ============ Basic map ============

/// One pin per doctor, with alphabetical filters
#[component]
pub fn DoctorsMap() -> impl IntoView {
    let records = create_rw_signal(Vec::<ProfileRecord>::new());
    let loading = create_rw_signal(true);
    let specialty = create_rw_signal(ALL.to_string());
    let governorate = create_rw_signal(ALL.to_string());
    load_dataset(DEFAULT_PROFILES_CSV, records, loading);

    let filter = create_memo(move |_| DoctorFilter {
        specialty: selection(&specialty.get()),
        governorate: selection(&governorate.get()),
    });
    let specialties = create_memo(move |_| {
        records.with(|r| distinct_sorted(r, |d| d.listing.specialty.as_str()))
    });
    let governorates = create_memo(move |_| {
        records.with(|r| distinct_sorted(r, |d| d.listing.governorate()))
    });
    let shown = create_memo(move |_| records.with(|r| filter.with(|f| f.count(r))));

    let container = create_node_ref::<html::Div>();
    let slot = MapSlot::new(TUNISIA_CENTER, TUNISIA_ZOOM);

    create_effect(move |_| {
        let filter = filter.get();
        let Some(element) = container.get() else { return };
        records.with(|records| {
            let visible = filter.apply(records);
            slot.redraw(&element, leaflet::layer_group, |map, group| {
                for record in &visible {
                    let marker = leaflet::marker(
                        &leaflet::lat_lng(record.lat(), record.lng()),
                        &leaflet::options(&[]),
                    );
                    marker.bind_popup(&profile_popup(record), &JsValue::UNDEFINED);
                    group.add_layer(&marker);
                }
                leaflet::fit_to(map, &coordinates(&visible));
            });
        });
    });

    view! {
        <section class="bg-white rounded-xl shadow p-6">
            <h2 class="text-xl font-semibold">"Geographic Distribution of Doctors"</h2>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4 mt-4">
                <FilterSelect
                    label="Filter by Specialty"
                    all_label="All Specialties"
                    value=specialty
                    options=Signal::derive(move || plain_options(&specialties.get()))
                />
                <FilterSelect
                    label="Filter by Governorate"
                    all_label="All Governorates"
                    value=governorate
                    options=Signal::derive(move || plain_options(&governorates.get()))
                />
            </div>
            <p class="text-sm text-gray-500 mt-2">
                "Showing " {move || shown.get()} " of " {move || records.with(Vec::len)} " doctors"
            </p>
            <div class="mt-4">
                <LoadingOverlay loading=loading>
                    <div node_ref=container class="h-[600px] w-full rounded-lg overflow-hidden" style="z-index: 0" />
                </LoadingOverlay>
            </div>
        </section>
    }
}

// ============ Cluster map ============

/// Proximity clusters sized and coloured by member count
#[component]
pub fn ClusterMap() -> impl IntoView {
    let records = create_rw_signal(Vec::<ProfileRecord>::new());
    let loading = create_rw_signal(true);
    let specialty = create_rw_signal(ALL.to_string());
    let radius = create_rw_signal(ClusterRadius::default());
    load_dataset(DEFAULT_PROFILES_CSV, records, loading);

    let specialties = create_memo(move |_| {
        records.with(|r| distinct_sorted(r, |d| d.listing.specialty.as_str()))
    });
    let summary = create_rw_signal((0usize, 0usize));

    let container = create_node_ref::<html::Div>();
    let slot = MapSlot::new(TUNISIA_CENTER, TUNISIA_ZOOM);

    create_effect(move |_| {
        let filter = DoctorFilter {
            specialty: selection(&specialty.get()),
            governorate: None,
        };
        let degrees = radius.get().degrees();
        let Some(element) = container.get() else { return };

        records.with(|records| {
            let visible = filter.apply(records);
            let clusters = cluster_points(visible.iter().copied(), degrees);
            let _ = summary.try_set((visible.len(), clusters.len()));

            slot.redraw(&element, leaflet::layer_group, |map, group| {
                for cluster in &clusters {
                    let tier = cluster.tier();
                    let circle = leaflet::circle_marker(
                        &leaflet::lat_lng(cluster.lat, cluster.lng),
                        &leaflet::options(&[
                            ("radius", JsValue::from(tier.radius_px)),
                            ("color", JsValue::from_str(tier.color)),
                            ("fillColor", JsValue::from_str(tier.color)),
                            ("fillOpacity", JsValue::from_f64(0.6)),
                            ("weight", JsValue::from_f64(2.0)),
                        ]),
                    );
                    circle.bind_popup(&cluster_popup(cluster), &leaflet::options(&[("maxWidth", JsValue::from_f64(300.0))]));
                    group.add_layer(&circle);
                }
                let centers: Vec<(f64, f64)> = clusters.iter().map(|c| (c.lat, c.lng)).collect();
                leaflet::fit_to(map, &centers);
            });
        });
    });

    let on_radius = move |ev| {
        if let Ok(value) = event_target_value(&ev).parse::<ClusterRadius>() {
            radius.set(value);
        }
    };

    view! {
        <section class="bg-white rounded-xl shadow p-6">
            <h2 class="text-xl font-semibold">"Geographic Distribution & Clustering"</h2>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4 mt-4">
                <FilterSelect
                    label="Filter by Specialty"
                    all_label="All Specialties"
                    value=specialty
                    options=Signal::derive(move || plain_options(&specialties.get()))
                />
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-2">"Cluster Radius"</label>
                    <select
                        class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
                        on:change=on_radius
                    >
                        {ClusterRadius::ALL
                            .into_iter()
                            .map(|r| view! {
                                <option value=r.key() selected=move || radius.get() == r>{r.label()}</option>
                            })
                            .collect_view()}
                    </select>
                </div>
            </div>
            <div class="flex flex-wrap items-center gap-4 mt-3 text-xs text-gray-600">
                {TIERS
                    .iter()
                    .map(|tier| view! {
                        <span class="flex items-center gap-1">
                            <span class="w-3 h-3 rounded-full inline-block" style=format!("background-color: {}", tier.color) />
                            {tier.label}
                        </span>
                    })
                    .collect_view()}
            </div>
            <p class="text-sm text-gray-500 mt-2">
                {move || {
                    let (doctors, clusters) = summary.get();
                    format!("{} doctors in {} clusters", doctors, clusters)
                }}
            </p>
            <div class="mt-4">
                <LoadingOverlay loading=loading>
                    <div node_ref=container class="h-[600px] w-full rounded-lg overflow-hidden" style="z-index: 0" />
                </LoadingOverlay>
            </div>
        </section>
    }
}

// ============ Interactive map ============

/// Marker-clustered directory map with frequency-ranked filters
#[component]
pub fn InteractiveMap() -> impl IntoView {
    let records = create_rw_signal(Vec::<DirectoryRecord>::new());
    let loading = create_rw_signal(true);
    let specialty = create_rw_signal(ALL.to_string());
    let governorate = create_rw_signal(ALL.to_string());
    load_dataset(DEFAULT_DIRECTORY_CSV, records, loading);

    let filter = create_memo(move |_| DoctorFilter {
        specialty: selection(&specialty.get()),
        governorate: selection(&governorate.get()),
    });
    let specialties = create_memo(move |_| {
        records.with(|r| rank_by_frequency(r, |d| d.listing.specialty.as_str()))
    });
    let governorates = create_memo(move |_| {
        records.with(|r| {
            rank_by_frequency(r, |d| d.listing.governorate())
                .into_iter()
                .map(|(gov, _)| {
                    let count = DoctorFilter::new().with_governorate(gov.clone()).count(r);
                    (gov, count)
                })
                .collect::<Vec<_>>()
        })
    });
    let shown = create_memo(move |_| records.with(|r| filter.with(|f| f.count(r))));

    let container = create_node_ref::<html::Div>();
    let slot = MapSlot::new(TUNISIA_CENTER, TUNISIA_ZOOM);

    create_effect(move |_| {
        let filter = filter.get();
        let Some(element) = container.get() else { return };
        records.with(|records| {
            let visible = filter.apply(records);
            slot.redraw(&element, marker_cluster_layer, |map, group| {
                for record in &visible {
                    let marker = leaflet::marker(
                        &leaflet::lat_lng(record.lat(), record.lng()),
                        &leaflet::options(&[("icon", doctor_icon())]),
                    );
                    marker.bind_popup(
                        &directory_popup(record),
                        &leaflet::options(&[("maxWidth", JsValue::from_f64(300.0))]),
                    );
                    group.add_layer(&marker);
                }
                leaflet::fit_to(map, &coordinates(&visible));
            });
        });
    });

    view! {
        <section class="bg-white rounded-xl shadow p-6">
            <h2 class="text-xl font-semibold">"🗺️ Geographic Distribution of Doctors in Tunisia"</h2>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4 mt-4">
                <FilterSelect
                    label="Filter by Specialty"
                    all_label="🏥 All Specialties"
                    value=specialty
                    options=Signal::derive(move || counted_options(&specialties.get()))
                />
                <FilterSelect
                    label="Filter by Governorate"
                    all_label="📍 All Governorates"
                    value=governorate
                    options=Signal::derive(move || counted_options(&governorates.get()))
                />
            </div>
            <div class="flex items-center justify-between mt-3 text-sm">
                <p class="text-gray-600">
                    "Showing " <strong>{move || shown.get()}</strong>
                    " of " <strong>{move || records.with(Vec::len)}</strong> " doctors"
                </p>
                <p class="text-gray-500 text-xs">"Click markers or clusters to explore"</p>
            </div>
            <div class="mt-4">
                <LoadingOverlay loading=loading>
                    <div
                        node_ref=container
                        class="h-[700px] w-full rounded-lg overflow-hidden border-2 border-gray-200 shadow-lg"
                        style="z-index: 0"
                    />
                </LoadingOverlay>
            </div>
        </section>
    }
}

fn marker_cluster_layer() -> leaflet::LayerGroup {
    leaflet::marker_cluster_group(&leaflet::options(&[
        ("chunkedLoading", JsValue::TRUE),
        ("spiderfyOnMaxZoom", JsValue::TRUE),
        ("showCoverageOnHover", JsValue::FALSE),
        ("zoomToBoundsOnClick", JsValue::TRUE),
    ]))
}

fn doctor_icon() -> JsValue {
    let size = |w: f64, h: f64| -> JsValue {
        [JsValue::from_f64(w), JsValue::from_f64(h)]
            .into_iter()
            .collect::<js_sys::Array>()
            .into()
    };
    leaflet::div_icon(&leaflet::options(&[
        ("html", JsValue::from_str("<div class=\"doctor-pin\"></div>")),
        ("className", JsValue::from_str("custom-marker-icon")),
        ("iconSize", size(30.0, 30.0)),
        ("iconAnchor", size(15.0, 30.0)),
        ("popupAnchor", size(0.0, -30.0)),
    ]))
}

// ============ Filter select ============

/// Option lists: `(value, label)` pairs, without the "all" entry
fn plain_options(values: &[String]) -> Vec<(String, String)> {
    values.iter().map(|v| (v.clone(), v.clone())).collect()
}

fn counted_options(values: &[(String, usize)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(value, count)| (value.clone(), format!("{} ({})", value, count)))
        .collect()
}

#[component]
fn FilterSelect(
    label: &'static str,
    all_label: &'static str,
    value: RwSignal<String>,
    #[prop(into)]
    options: Signal<Vec<(String, String)>>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700 mb-2">{label}</label>
            <select
                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500 text-sm"
                on:change=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
            >
                <option value=ALL>{all_label}</option>
                {move || {
                    options
                        .get()
                        .into_iter()
                        .map(|(key, text)| {
                            let selected = key == value.get_untracked();
                            view! { <option value=key selected=selected>{text}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

// ============ Popups ============

fn profile_popup(record: &ProfileRecord) -> String {
    let listing = &record.listing;
    let mut html = format!(
        "<div class=\"p-2\">\
         <h3 class=\"font-bold text-gray-900 mb-1\">{}</h3>\
         <p class=\"text-sm font-medium text-blue-600 mb-2\">{}</p>\
         <div class=\"space-y-1 text-xs text-gray-600\">\
         <p><strong>Address:</strong> {}</p>",
        escape_html(&listing.name),
        escape_html(&listing.specialty),
        escape_html(&listing.address),
    );
    if !listing.phone1.is_empty() {
        html.push_str(&format!("<p><strong>Phone:</strong> {}</p>", escape_html(&listing.phone1)));
    }
    if !listing.phone2.is_empty() {
        html.push_str(&format!("<p><strong>Phone 2:</strong> {}</p>", escape_html(&listing.phone2)));
    }
    html.push_str("</div>");
    if !listing.presentation.is_empty() {
        html.push_str(&format!(
            "<p class=\"text-xs text-gray-500 mt-2\">{}</p>",
            escape_html(&listing.presentation)
        ));
    }
    html.push_str("</div>");
    html
}

fn cluster_popup(cluster: &Cluster<'_, ProfileRecord>) -> String {
    let mut html = format!(
        "<div class=\"p-2\"><h3 class=\"font-bold text-gray-900 mb-2\">{} doctor{} in this area</h3>\
         <div style=\"max-height: 16rem; overflow-y: auto;\">",
        cluster.count(),
        if cluster.count() == 1 { "" } else { "s" },
    );
    for record in &cluster.members {
        let listing = &record.listing;
        html.push_str(&format!(
            "<div style=\"border-bottom: 1px solid #e5e7eb; padding-bottom: 6px; margin-bottom: 6px;\">\
             <p class=\"font-semibold text-sm text-gray-900\">{}</p>\
             <p class=\"text-xs text-blue-600 font-medium\">{}</p>\
             <p class=\"text-xs text-gray-600 mt-1\">{}</p>",
            escape_html(&listing.name),
            escape_html(&listing.specialty),
            escape_html(&listing.address),
        ));
        if !listing.phone1.is_empty() {
            html.push_str(&format!(
                "<p class=\"text-xs text-gray-500\">📞 {}</p>",
                escape_html(&listing.phone1)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></div>");
    html
}

fn directory_popup(record: &DirectoryRecord) -> String {
    let listing = &record.listing;
    let mut html = format!(
        "<div style=\"min-width: 200px;\">\
         <h3 style=\"margin: 0 0 8px 0; font-size: 16px; font-weight: bold; color: #1f2937;\">{}</h3>\
         <p style=\"margin: 0 0 8px 0; font-size: 14px; color: #2563eb; font-weight: 500;\">🩺 {}</p>\
         <p style=\"margin: 0 0 4px 0; font-size: 12px; color: #4b5563;\">📍 {}</p>",
        escape_html(&listing.name),
        escape_html(&listing.specialty),
        escape_html(&listing.address),
    );
    for phone in [&listing.phone1, &listing.phone2] {
        if !phone.is_empty() {
            html.push_str(&format!(
                "<p style=\"margin: 0 0 4px 0; font-size: 12px; color: #4b5563;\">📞 {}</p>",
                escape_html(phone)
            ));
        }
    }

    let hours = record.working_hours();
    if !hours.is_empty() {
        html.push_str(
            "<div style=\"margin-top: 8px; padding-top: 8px; border-top: 1px solid #e5e7eb;\">\
             <p style=\"margin: 0 0 4px 0; font-size: 12px; font-weight: 600; color: #374151;\">🕒 Horaires:</p>",
        );
        for (day, time) in hours {
            html.push_str(&format!(
                "<p style=\"margin: 0 0 2px 0; font-size: 11px; color: #6b7280; padding-left: 16px;\">{}: {}</p>",
                day,
                escape_html(time)
            ));
        }
        html.push_str("</div>");
    }

    if !record.url.is_empty() {
        html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\" \
             style=\"display: inline-block; margin-top: 8px; padding: 4px 12px; background-color: #2563eb; \
             color: white; text-decoration: none; border-radius: 4px; font-size: 12px;\">Voir Profil</a>",
            escape_html(&record.url)
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_row(line: &str) -> DirectoryRecord {
        let text = format!("header\n{}\n", line);
        parse_csv::<DirectoryRecord>(&text).unwrap().records.remove(0)
    }

    #[test]
    fn test_directory_popup_lists_open_days_and_link() {
        let record = directory_row(
            "https://med.tn/dr-a,Dr. A,ORL,71 111 111,,Rue X Ariana,36.86,10.19,,8h-12h,,9h-17h,,,,",
        );
        let html = directory_popup(&record);
        assert!(html.contains("Lundi: 8h-12h"));
        assert!(html.contains("Mercredi: 9h-17h"));
        assert!(!html.contains("Mardi"));
        assert!(html.contains("href=\"https://med.tn/dr-a\""));
        assert!(html.contains("📞 71 111 111"));
    }

    #[test]
    fn test_directory_popup_without_hours_or_url() {
        let record = directory_row(",Dr. B,ORL,,,Sfax,34.7,10.7,,,,,,,,");
        let html = directory_popup(&record);
        assert!(!html.contains("Horaires"));
        assert!(!html.contains("Voir Profil"));
        assert!(!html.contains("📞"));
    }

    #[test]
    fn test_profile_popup_escapes_text() {
        let text = "header\n,Dr. <C>,ORL,,,Tunis,36.8,10.2,Bio & plus\n";
        let record = parse_csv::<ProfileRecord>(text).unwrap().records.remove(0);
        let html = profile_popup(&record);
        assert!(html.contains("Dr. &lt;C&gt;"));
        assert!(html.contains("Bio &amp; plus"));
        assert!(!html.contains("Phone:"));
    }

    #[test]
    fn test_cluster_popup_counts_members() {
        let text = "header\n,Dr. A,ORL,,,Tunis,36.80,10.18\n,Dr. B,ORL,,,Tunis,36.81,10.19\n";
        let dataset = parse_csv::<ProfileRecord>(text).unwrap();
        let clusters = cluster_points(&dataset.records, 0.05);
        let html = cluster_popup(&clusters[0]);
        assert!(html.contains("2 doctors in this area"));
        assert!(html.contains("Dr. A") && html.contains("Dr. B"));
    }

    #[test]
    fn test_counted_options() {
        let options = counted_options(&[("Tunis".to_string(), 12), ("Sfax".to_string(), 3)]);
        assert_eq!(options[0], ("Tunis".to_string(), "Tunis (12)".to_string()));
        assert_eq!(options.len(), 2);
    }
}
