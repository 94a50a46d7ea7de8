use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use serde_wasm_bindgen::to_value;
use shared::{
    Bounds, Coordinate, Itinerary, ItineraryRequest, Place, ServiceError,
    render::{MapCanvas, MarkerSpec, PathSpec, render_day},
};
use wasm_bindgen::{
    JsCast,
    prelude::{JsValue, wasm_bindgen},
};

const HOTEL_INPUT_ID: &str = "hotel-input";
const PLACE_INPUT_ID: &str = "place-input";

#[wasm_bindgen(module = "/map_widget.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map();
    #[wasm_bindgen(js_name = attachAutocomplete)]
    fn attach_autocomplete(input_id: &str, target: &str);
    #[wasm_bindgen(js_name = clearOverlays)]
    fn clear_overlays();
    #[wasm_bindgen(js_name = drawMarker)]
    fn draw_marker_js(marker: JsValue);
    #[wasm_bindgen(js_name = drawPath)]
    fn draw_path_js(path: JsValue);
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(bounds: JsValue);
}

fn api_endpoint() -> String {
    let root = option_env!("FRONTEND_API_ROOT").unwrap_or("http://localhost:8000");
    format!("{}/generate-itinerary", root.trim_end_matches('/'))
}

/// Canvas backed by the JS map widget module.
struct WidgetCanvas;

impl MapCanvas for WidgetCanvas {
    fn clear(&mut self) {
        clear_overlays();
    }

    fn draw_marker(&mut self, marker: &MarkerSpec) {
        if let Ok(value) = to_value(marker) {
            draw_marker_js(value);
        }
    }

    fn draw_path(&mut self, path: &PathSpec) {
        if let Ok(value) = to_value(path) {
            draw_path_js(value);
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        if let Ok(value) = to_value(&bounds) {
            fit_bounds_js(value);
        }
    }
}

pub struct Model {
    hotel_form: HotelForm,
    place_form: PlaceForm,
    hotel: Option<Place>,
    places: Vec<Place>,
    days: u32,
    pending: bool,
    itinerary: Option<Itinerary>,
    selected_day: Option<String>,
    error: Option<String>,
}

#[derive(Default, Clone)]
struct HotelForm {
    name: String,
    coordinates: Option<Coordinate>,
    days: String,
}

impl HotelForm {
    fn to_hotel(&self) -> Result<(Place, u32), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Enter a hotel name".into());
        }
        let coordinates = self
            .coordinates
            .ok_or("Pick the hotel from the suggestions so its location is known")?;
        let days = self
            .days
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|days| *days >= 1)
            .ok_or("Number of days must be at least 1")?;
        Ok((
            Place {
                name: name.to_string(),
                coordinates,
            },
            days,
        ))
    }
}

#[derive(Default, Clone)]
struct PlaceForm {
    name: String,
    coordinates: Option<Coordinate>,
}

impl PlaceForm {
    fn to_place(&self) -> Result<Place, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Enter a place to visit".into());
        }
        let coordinates = self
            .coordinates
            .ok_or("Pick the place from the suggestions so its location is known")?;
        Ok(Place {
            name: name.to_string(),
            coordinates,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutocompleteTarget {
    Hotel,
    Place,
}

/// Payload of the `place-resolved` window event raised by the autocomplete
/// widget.
#[derive(Clone, Debug, Deserialize)]
pub struct ResolvedPlace {
    target: AutocompleteTarget,
    name: String,
    lat: f64,
    lng: f64,
}

pub enum Msg {
    HotelNameChanged(String),
    DaysChanged(String),
    SubmitHotel,
    PlaceNameChanged(String),
    SubmitPlace,
    RemovePlace(usize),
    PlaceResolved(ResolvedPlace),
    PlanTrip,
    ItineraryFetched(Result<Itinerary, String>),
    SelectDay(String),
}

impl Model {
    fn new() -> Self {
        Self {
            hotel_form: HotelForm {
                days: "1".into(),
                ..Default::default()
            },
            place_form: PlaceForm::default(),
            hotel: None,
            places: Vec::new(),
            days: 1,
            pending: false,
            itinerary: None,
            selected_day: None,
            error: None,
        }
    }

    fn can_plan(&self) -> bool {
        !self.pending
            && self.hotel.as_ref().is_some_and(|hotel| !hotel.name.is_empty())
            && !self.places.is_empty()
    }

    fn plan_request(&self) -> Option<ItineraryRequest> {
        if !self.can_plan() {
            return None;
        }
        Some(ItineraryRequest {
            hotel: self.hotel.clone()?,
            places: self.places.clone(),
            days: self.days,
        })
    }

    fn resolve_place(&mut self, resolved: ResolvedPlace) {
        let coordinates = Some(Coordinate {
            lat: resolved.lat,
            lng: resolved.lng,
        });
        match resolved.target {
            AutocompleteTarget::Hotel => {
                self.hotel_form.name = resolved.name;
                self.hotel_form.coordinates = coordinates;
            }
            AutocompleteTarget::Place => {
                self.place_form.name = resolved.name;
                self.place_form.coordinates = coordinates;
            }
        }
    }

    /// Stores a fetched itinerary and selects its first day. Returns `true`
    /// when there is something to draw.
    fn accept_itinerary(&mut self, result: Result<Itinerary, String>) -> bool {
        self.pending = false;
        match result {
            Ok(itinerary) if !itinerary.is_empty() => {
                self.selected_day = itinerary.first_day().map(str::to_string);
                self.itinerary = Some(itinerary);
                self.error = None;
                true
            }
            Ok(_) => {
                self.error = Some(planning_error("Received empty itinerary data"));
                false
            }
            Err(err) => {
                self.error = Some(planning_error(&err));
                false
            }
        }
    }
}

fn planning_error(detail: &str) -> String {
    format!("An error occurred while planning the trip: {detail}. Please try again.")
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("place-resolved"), |event| {
        let detail = event.dyn_into::<web_sys::CustomEvent>().ok()?.detail();
        let resolved: ResolvedPlace = serde_wasm_bindgen::from_value(detail).ok()?;
        web_sys::console::debug_1(
            &format!(
                "[frontend] {:?} resolved to {} ({:.5},{:.5})",
                resolved.target, resolved.name, resolved.lat, resolved.lng
            )
            .into(),
        );
        Some(Msg::PlaceResolved(resolved))
    }));
    orders.after_next_render(|_| {
        attach_autocomplete(HOTEL_INPUT_ID, "hotel");
        attach_autocomplete(PLACE_INPUT_ID, "place");
    });

    Model::new()
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::HotelNameChanged(val) => model.hotel_form.name = val,
        Msg::DaysChanged(val) => model.hotel_form.days = val,
        Msg::SubmitHotel => match model.hotel_form.to_hotel() {
            Ok((hotel, days)) => {
                model.hotel = Some(hotel);
                model.days = days;
                model.error = None;
            }
            Err(err) => model.error = Some(err),
        },
        Msg::PlaceNameChanged(val) => model.place_form.name = val,
        Msg::SubmitPlace => match model.place_form.to_place() {
            Ok(place) => {
                model.places.push(place);
                model.place_form = PlaceForm::default();
                model.error = None;
            }
            Err(err) => model.error = Some(err),
        },
        Msg::RemovePlace(idx) => {
            if idx < model.places.len() {
                model.places.remove(idx);
            }
        }
        Msg::PlaceResolved(resolved) => model.resolve_place(resolved),
        Msg::PlanTrip => {
            if let Some(payload) = model.plan_request() {
                model.pending = true;
                model.error = None;
                orders.perform_cmd(send_itinerary_request(payload));
            }
        }
        Msg::ItineraryFetched(result) => {
            if model.accept_itinerary(result) {
                draw_selected_day(model);
            }
        }
        Msg::SelectDay(day) => {
            model.selected_day = Some(day);
            draw_selected_day(model);
        }
    }
}

fn draw_selected_day(model: &mut Model) {
    let (Some(itinerary), Some(key)) = (&model.itinerary, &model.selected_day) else {
        return;
    };
    let Some(day) = itinerary.day(key) else {
        return;
    };
    match render_day(&mut WidgetCanvas, day) {
        Ok(summary) => web_sys::console::debug_1(
            &format!(
                "[frontend] drew {key}: {} markers, {} paths, {} points",
                summary.markers, summary.paths, summary.points
            )
            .into(),
        ),
        Err(err) => model.error = Some(err.to_string()),
    }
}

async fn send_itinerary_request(payload: ItineraryRequest) -> Msg {
    web_sys::console::debug_1(
        &format!(
            "[frontend] planning {} day(s) for {} place(s) from {}",
            payload.days,
            payload.places.len(),
            payload.hotel.name
        )
        .into(),
    );
    let response = match Request::new(api_endpoint())
        .method(Method::Post)
        .json(&payload)
    {
        Err(err) => Err(format!("{err:?}")),
        Ok(request) => match request.fetch().await {
            Err(err) => Err(format!("{err:?}")),
            Ok(raw) => {
                let status = raw.status();
                if status.is_ok() {
                    raw.json::<Itinerary>().await.map_err(|err| format!("{err:?}"))
                } else {
                    Err(raw
                        .json::<ServiceError>()
                        .await
                        .map(|err| err.detail)
                        .unwrap_or_else(|_| format!("HTTP error! status: {}", status.code)))
                }
            }
        },
    };

    Msg::ItineraryFetched(response)
}

pub fn view(model: &Model) -> Node<Msg> {
    let header = h1!["🌍 Trip Planner"];
    let inputs = div![
        C!["inputs"],
        view_hotel_form(model),
        view_place_form(model),
        view_places(model),
        view_plan_button(model),
    ];
    let itinerary = model
        .itinerary
        .as_ref()
        .map(|itinerary| view_itinerary(itinerary, model.selected_day.as_deref()))
        .unwrap_or_else(|| empty![]);

    div![C!["app-container"], header, inputs, itinerary]
}

fn view_hotel_form(model: &Model) -> Node<Msg> {
    form![
        C!["controls"],
        ev(Ev::Submit, |event| {
            event.prevent_default();
            Msg::SubmitHotel
        }),
        fieldset![
            legend!["Hotel Information"],
            div![
                C!["input-field"],
                label![attrs! { At::For => HOTEL_INPUT_ID }, "Hotel Name and Location"],
                input![
                    attrs! {
                        At::Id => HOTEL_INPUT_ID,
                        At::Value => &model.hotel_form.name,
                        At::Placeholder => "Search for a hotel",
                        At::AutoComplete => "off",
                    },
                    input_ev(Ev::Input, Msg::HotelNameChanged),
                ]
            ],
            div![
                C!["input-field"],
                label![attrs! { At::For => "days" }, "Number of Days"],
                input![
                    attrs! {
                        At::Id => "days",
                        At::Type => "number",
                        At::Min => "1",
                        At::Value => &model.hotel_form.days,
                    },
                    input_ev(Ev::Input, Msg::DaysChanged),
                ]
            ],
            button!["Set Hotel", attrs! { At::Type => "submit" }],
            model
                .hotel
                .as_ref()
                .map(|hotel| {
                    small![format!(
                        "{} · {} day(s)",
                        hotel.name, model.days
                    )]
                })
                .unwrap_or_else(|| empty![]),
        ]
    ]
}

fn view_place_form(model: &Model) -> Node<Msg> {
    form![
        C!["controls"],
        ev(Ev::Submit, |event| {
            event.prevent_default();
            Msg::SubmitPlace
        }),
        fieldset![
            legend!["Add a Place"],
            input![
                attrs! {
                    At::Id => PLACE_INPUT_ID,
                    At::Value => &model.place_form.name,
                    At::Placeholder => "Search for a place to visit",
                    At::AutoComplete => "off",
                },
                input_ev(Ev::Input, Msg::PlaceNameChanged),
            ],
            button!["Add Place", attrs! { At::Type => "submit" }],
        ]
    ]
}

fn view_places(model: &Model) -> Node<Msg> {
    let items = model.places.iter().enumerate().map(|(idx, place)| {
        li![
            span![C!["place-name"], &place.name],
            button![
                C!["remove-btn"],
                attrs! { At::from("aria-label") => format!("Remove {}", place.name) },
                "✕",
                ev(Ev::Click, move |event| {
                    event.prevent_default();
                    Msg::RemovePlace(idx)
                }),
            ],
        ]
    });

    div![
        C!["places"],
        h2!["Places to Visit"],
        if model.places.is_empty() {
            p!["No places added yet."]
        } else {
            ul![items]
        }
    ]
}

fn view_plan_button(model: &Model) -> Node<Msg> {
    div![
        button![
            C!["plan-btn"],
            if model.pending { "Planning..." } else { "Plan Trip" },
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::PlanTrip
            }),
            attrs! { At::Disabled => bool_attr(!model.can_plan()) },
        ],
        if let Some(error) = &model.error {
            p![C!["error"], error]
        } else {
            empty![]
        }
    ]
}

fn view_itinerary(itinerary: &Itinerary, selected: Option<&str>) -> Node<Msg> {
    let options = itinerary.day_keys().into_iter().map(|key| {
        option![
            attrs! {
                At::Value => key,
                At::Selected => bool_attr(Some(key) == selected),
            },
            key
        ]
    });

    let stops = selected
        .and_then(|key| itinerary.day(key))
        .map(|day| {
            ol![
                C!["stops"],
                day.route.iter().map(|place| li![&place.name])
            ]
        })
        .unwrap_or_else(|| empty![]);

    div![
        C!["itinerary"],
        h2!["Your Itinerary"],
        label![attrs! { At::For => "day-select" }, "Select Day"],
        select![
            attrs! { At::Id => "day-select" },
            options,
            input_ev(Ev::Change, Msg::SelectDay),
        ],
        stops,
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    init_map();
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}
