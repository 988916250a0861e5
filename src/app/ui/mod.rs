mod controls;
mod details;
mod fps;
mod list;
mod panels;
