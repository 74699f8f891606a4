//! Dashboard Page
//!
//! Summary figures, the specialty and governorate charts, and the three
//! dataset maps.

use leptos::*;

use tunimed::catalog::{StatRow, DASHBOARD_SUMMARY, GOVERNORATE_STATS, SPECIALTY_STATS};

use crate::components::{BarChart, ClusterMap, DoctorsMap, InteractiveMap, Orientation};

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let summary = DASHBOARD_SUMMARY;
    let specialties: &'static [StatRow] = &SPECIALTY_STATS;
    let governorates: &'static [StatRow] = &GOVERNORATE_STATS;

    view! {
        <div class="max-w-7xl mx-auto px-4 py-8 space-y-8">
            // Page header
            <div>
                <h1 class="text-3xl font-bold text-gray-900">"Medical Statistics Dashboard"</h1>
                <p class="text-gray-500 mt-1">"Doctors across Tunisia by specialty and region"</p>
            </div>

            // Summary cards
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <StatCard title="Total Doctors" value=summary.total_doctors caption="Across Tunisia" icon="👨‍⚕️" />
                <StatCard title="Specialties" value=summary.specialties caption="Medical specialties" icon="🩺" />
                <StatCard title="Governorates" value=summary.governorates caption="Regions covered" icon="📍" />
            </div>

            // Charts
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <BarChart
                    title="Top Specialties"
                    rows=specialties
                    orientation=Orientation::Vertical
                />
                <BarChart
                    title="Doctors by Governorate"
                    rows=governorates
                    orientation=Orientation::Horizontal
                    color="#10B981"
                />
            </div>

            // Maps
            <DoctorsMap />
            <ClusterMap />
            <InteractiveMap />
        </div>
    }
}

#[component]
fn StatCard(
    title: &'static str,
    value: u32,
    caption: &'static str,
    icon: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl shadow p-6 flex items-center justify-between">
            <div>
                <p class="text-sm font-medium text-gray-500">{title}</p>
                <p class="text-3xl font-bold text-gray-900 mt-1">{value}</p>
                <p class="text-xs text-gray-400 mt-1">{caption}</p>
            </div>
            <div class="text-4xl">{icon}</div>
        </div>
    }
}
