mod fading;
mod routing;
mod startup;
