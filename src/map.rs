use std::time::Duration;

use crate::error::MapError;
use crate::types::coords::Coords;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration: Duration,
}

impl PanOptions {
    pub fn instant() -> Self {
        Self {
            animate: false,
            duration: Duration::ZERO,
        }
    }

    pub fn animated(duration: Duration) -> Self {
        Self {
            animate: true,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl Popup {
    /// Popups stay open while other markers are added or the map is clicked.
    pub fn sticky(content: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            class_name: class_name.into(),
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coords,
    pub zoom: u8,
}

/// The interactive map widget the bridge drives. Tiles, pan/zoom gestures and
/// popup rendering all live on the other side of this trait.
pub trait MapWidget {
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions);
    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> MarkerHandle;
}

/// Returned by [`MapBridge::on_click`]; pass it back to
/// [`MapBridge::unsubscribe`] to tear the handler down.
#[derive(Debug, PartialEq, Eq)]
pub struct ClickSubscription {
    id: u64,
}

type ClickHandler = Box<dyn FnMut(Coords)>;

pub struct MapBridge<M> {
    widget: M,
    view: Option<MapView>,
    markers: Vec<MarkerHandle>,
    handler: Option<(u64, ClickHandler)>,
    next_subscription: u64,
}

impl<M: MapWidget> MapBridge<M> {
    pub fn new(widget: M) -> Self {
        Self {
            widget,
            view: None,
            markers: Vec::new(),
            handler: None,
            next_subscription: 1,
        }
    }

    /// Must run exactly once, before any other map operation.
    pub fn initialize(&mut self, center: Coords, zoom: u8) -> Result<MapView, MapError> {
        if self.view.is_some() {
            return Err(MapError::AlreadyInitialized);
        }
        self.widget.set_view(center, zoom, PanOptions::instant());
        let view = MapView { center, zoom };
        self.view = Some(view);
        tracing::info!("Map initialized at {} (zoom {})", center, zoom);
        Ok(view)
    }

    pub fn is_initialized(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<MapView> {
        self.view
    }

    pub fn center_on(&mut self, coords: Coords, zoom: u8, pan: PanOptions) -> Result<(), MapError> {
        if self.view.is_none() {
            return Err(MapError::NotInitialized);
        }
        self.widget.set_view(coords, zoom, pan);
        self.view = Some(MapView {
            center: coords,
            zoom,
        });
        Ok(())
    }

    /// Adds a marker with its popup opened. Markers are never removed.
    pub fn place_marker(
        &mut self,
        coords: Coords,
        content: &str,
        class_name: &str,
    ) -> Result<MarkerHandle, MapError> {
        if self.view.is_none() {
            return Err(MapError::NotInitialized);
        }
        let handle = self
            .widget
            .add_marker(coords, &Popup::sticky(content, class_name));
        self.markers.push(handle);
        Ok(handle)
    }

    pub fn markers(&self) -> &[MarkerHandle] {
        &self.markers
    }

    /// Registers the single click handler for the map surface.
    pub fn on_click<F>(&mut self, handler: F) -> Result<ClickSubscription, MapError>
    where
        F: FnMut(Coords) + 'static,
    {
        if self.view.is_none() {
            return Err(MapError::NotInitialized);
        }
        if self.handler.is_some() {
            return Err(MapError::HandlerActive);
        }
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.handler = Some((id, Box::new(handler)));
        Ok(ClickSubscription { id })
    }

    pub fn unsubscribe(&mut self, subscription: ClickSubscription) -> Result<(), MapError> {
        match &self.handler {
            Some((id, _)) if *id == subscription.id => {
                self.handler = None;
                Ok(())
            }
            _ => Err(MapError::UnknownSubscription(subscription.id)),
        }
    }

    /// Entry point for the widget's click events on the map surface. Returns
    /// whether a handler received the click.
    pub fn dispatch_click(&mut self, coords: Coords) -> bool {
        match self.handler.as_mut() {
            Some((_, handler)) => {
                handler(coords);
                true
            }
            None => {
                tracing::debug!("Map click at {} with no handler", coords);
                false
            }
        }
    }

    pub fn widget(&self) -> &M {
        &self.widget
    }
}
